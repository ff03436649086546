//! Contact scene: ground, block, hammer and the impact force pair

use crate::simulation::contact::ContactSim;
use crate::simulation::frame::FrameSize;
use crate::simulation::params::{DisplayOptions, ViewMode};
use crate::simulation::states::NVec2;
use crate::visualization::style::{highlight_pair, style_for, ArrowRole};
use crate::visualization::surface::DrawSurface;
use crate::visualization::vectors::{ArrowScale, ForceVectorPair};

/// Half width of the block, reference pixels
const BLOCK_HALF_WIDTH: f64 = 60.0;

/// Horizontal offset of each arrow from the scene centre line
const ARROW_OFFSET: f64 = 18.0;

/// Arrow mapping for impact forces (22 up to 2200) at scene scale `s`
pub fn contact_arrow_scale(s: f64) -> ArrowScale {
    ArrowScale::new(0.06 * s, 110.0 * s).with_floor(10.0 * s)
}

/// The impact pair, anchored at the contact surface
///
/// Arrow A is the hammer's push on the block (down), arrow B the block's
/// push back on the hammer (up).
pub fn contact_pair(force: f64, center_x: f64, target_y: f64, striker_y: f64, s: f64) -> ForceVectorPair {
    let offset = ARROW_OFFSET * s;
    ForceVectorPair::new(
        force,
        NVec2::new(center_x + offset, target_y),
        NVec2::new(0.0, 1.0),
        NVec2::new(center_x - offset, striker_y),
        &contact_arrow_scale(s),
    )
}

pub fn draw_contact_scene(surface: &mut dyn DrawSurface, sim: &ContactSim, frame: FrameSize, mode: ViewMode, display: &DisplayOptions) {
    let style = style_for(mode);
    let geometry = sim.geometry();
    let state = sim.state();
    let s = geometry.scale;

    style.background(surface);
    style.ground(surface, frame, geometry.ground_y);

    let half_w = BLOCK_HALF_WIDTH * s;
    style.block(
        surface,
        NVec2::new(geometry.center_x - half_w, state.target_y),
        NVec2::new(geometry.center_x + half_w, geometry.ground_y),
    );
    style.hammer(surface, geometry.center_x, state.striker_y, s);

    let impact = state.impact();
    if !impact.active {
        return;
    }

    let pair = contact_pair(impact.force_magnitude, geometry.center_x, state.target_y, state.striker_y, s);
    if display.highlight_pair {
        highlight_pair(surface, &pair, s);
    }

    let force = impact.force_magnitude;
    style.force_arrow(surface, &pair.arrow_a(), ArrowRole::Action, &format!("F on block by hammer = {force:.0} N"), s);
    style.force_arrow(surface, &pair.arrow_b(), ArrowRole::Reaction, &format!("F on hammer by block = {force:.0} N"), s);
    style.pair_annotations(
        surface,
        &pair,
        (&format!("hammer on block, {force:.0} N"), &format!("block on hammer, {force:.0} N")),
        s,
    );
}
