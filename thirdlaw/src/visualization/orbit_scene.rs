//! Orbit scene: sky, orbit path, both bodies and the gravitational pair

use crate::simulation::forces::round_for_display;
use crate::simulation::frame::FrameSize;
use crate::simulation::orbit::{OrbitLayout, OrbitSim};
use crate::simulation::params::{DisplayOptions, ViewMode};
use crate::simulation::states::NVec2;
use crate::visualization::style::{highlight_pair, style_for, ArrowRole, BodyKind, SceneStyle};
use crate::visualization::surface::DrawSurface;
use crate::visualization::vectors::{Arrow, ArrowScale, ForceVectorPair};

/// Pixels per unit of force at scale 1
const FORCE_PER_UNIT: f64 = 6.0;

/// Acceleration arrows are drawn this much longer per unit than forces
const ACCEL_GAIN: f64 = 3.0;

/// Shortest gravity arrow, reference pixels
const MIN_ARROW: f64 = 10.0;

/// Arrow mapping for gravity at this layout; arrows never reach past the
/// middle of the gap between the bodies
pub fn gravity_arrow_scale(layout: &OrbitLayout) -> ArrowScale {
    let s = layout.scale;
    ArrowScale::new(FORCE_PER_UNIT * s, (0.45 * layout.gap()).clamp(0.0, 120.0 * s)).with_floor(MIN_ARROW * s)
}

/// The gravitational pair, anchored on the facing edges of the bodies
///
/// Arrow A is the pull on the secondary (towards the primary), arrow B the
/// pull on the primary (towards the secondary).
pub fn gravity_pair(force: f64, layout: &OrbitLayout) -> ForceVectorPair {
    let towards_primary = (layout.primary - layout.secondary).try_normalize(1e-12).unwrap_or_else(|| NVec2::new(-1.0, 0.0));
    ForceVectorPair::new(
        force,
        layout.secondary + towards_primary * layout.secondary_radius,
        towards_primary,
        layout.primary - towards_primary * layout.primary_radius,
        &gravity_arrow_scale(layout),
    )
}

pub fn draw_orbit_scene(surface: &mut dyn DrawSurface, sim: &OrbitSim, frame: FrameSize, mode: ViewMode, display: &DisplayOptions) {
    let style = style_for(mode);
    let layout = sim.layout(frame, mode);
    let s = layout.scale;

    style.background(surface);
    style.sky(surface, sim.stars());
    if display.show_orbit_path {
        style.orbit_path(surface, layout.primary, layout.path_radius);
    }

    style.body(surface, layout.primary, layout.primary_radius, BodyKind::Primary);
    style.body(surface, layout.secondary, layout.secondary_radius, BodyKind::Secondary);

    let forces = sim.forces();
    let force = round_for_display(forces.force);
    let pair = gravity_pair(forces.force, &layout);
    if display.highlight_pair {
        highlight_pair(surface, &pair, s);
    }
    style.force_arrow(surface, &pair.arrow_a(), ArrowRole::Action, &format!("F on m2 by m1 = {force:.2}"), s);
    style.force_arrow(surface, &pair.arrow_b(), ArrowRole::Reaction, &format!("F on m1 by m2 = {force:.2}"), s);
    style.pair_annotations(surface, &pair, (&format!("m1 pulls m2, {force:.2}"), &format!("m2 pulls m1, {force:.2}")), s);

    if display.show_acceleration {
        draw_accelerations(surface, style, &pair, &layout, forces.accel_secondary, forces.accel_primary);
    }
}

/// Per-body acceleration arrows, sized independently since a = F / m
/// differs between the bodies
fn draw_accelerations(surface: &mut dyn DrawSurface, style: &dyn SceneStyle, pair: &ForceVectorPair, layout: &OrbitLayout, accel_secondary: f64, accel_primary: f64) {
    let s = layout.scale;
    let force_scale = gravity_arrow_scale(layout);
    let scale = ArrowScale::new(force_scale.per_unit * ACCEL_GAIN, force_scale.cap).with_floor(force_scale.floor);
    let side = 10.0 * s;

    for (arrow, accel, name) in [(pair.arrow_a(), accel_secondary, "a2"), (pair.arrow_b(), accel_primary, "a1")] {
        let Some(dir) = arrow.direction() else {
            continue;
        };
        let shift = NVec2::new(-dir.y, dir.x) * side;
        let origin = arrow.origin + shift;
        let accel_arrow = Arrow::new(origin, origin + dir * scale.length(accel));
        style.force_arrow(surface, &accel_arrow, ArrowRole::Acceleration, &format!("{name} = {:.2}", round_for_display(accel)), s);
    }
}
