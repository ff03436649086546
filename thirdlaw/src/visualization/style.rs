//! Rendering strategies for the two view modes
//!
//! Scenes compute geometry once and hand it to a [`SceneStyle`]. Diagram
//! draws flat, schematic shapes with static annotations; explore draws
//! decorated shapes with labels on the arrows. Both share the primitives
//! at the bottom of this file.

use bevy::color::Color;

use crate::simulation::frame::FrameSize;
use crate::simulation::params::ViewMode;
use crate::simulation::states::NVec2;
use crate::simulation::starfield::Starfield;
use crate::visualization::surface::DrawSurface;
use crate::visualization::vectors::{head_length, Arrow, ForceVectorPair};

pub const ACTION_COLOR: Color = Color::srgb(0.90, 0.25, 0.20);
pub const REACTION_COLOR: Color = Color::srgb(0.20, 0.45, 0.95);
pub const ACCEL_COLOR: Color = Color::srgb(0.30, 0.80, 0.40);
pub const HIGHLIGHT_COLOR: Color = Color::srgb(1.0, 0.85, 0.10);

/// Which force an arrow represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowRole {
    Action,
    Reaction,
    Acceleration,
}

impl ArrowRole {
    pub fn color(self) -> Color {
        match self {
            ArrowRole::Action => ACTION_COLOR,
            ArrowRole::Reaction => REACTION_COLOR,
            ArrowRole::Acceleration => ACCEL_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Primary,
    Secondary,
}

pub trait SceneStyle: Sync {
    fn background(&self, surface: &mut dyn DrawSurface);

    fn ground(&self, surface: &mut dyn DrawSurface, frame: FrameSize, ground_y: f64);

    /// The penetrable block spanning `min`..`max`
    fn block(&self, surface: &mut dyn DrawSurface, min: NVec2, max: NVec2);

    /// The striking hammer, `face_y` is its lower face
    fn hammer(&self, surface: &mut dyn DrawSurface, center_x: f64, face_y: f64, s: f64);

    fn body(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64, kind: BodyKind);

    fn sky(&self, surface: &mut dyn DrawSurface, stars: &Starfield);

    fn orbit_path(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64);

    /// One arrow; `label` is the text explore mode shows beside it
    fn force_arrow(&self, surface: &mut dyn DrawSurface, arrow: &Arrow, role: ArrowRole, label: &str, s: f64);

    /// Static text describing a whole pair, drawn once per frame
    fn pair_annotations(&self, surface: &mut dyn DrawSurface, pair: &ForceVectorPair, names: (&str, &str), s: f64);
}

pub struct DiagramStyle;
pub struct ExploreStyle;

static DIAGRAM: DiagramStyle = DiagramStyle;
static EXPLORE: ExploreStyle = ExploreStyle;

/// Strategy for a view mode
pub fn style_for(mode: ViewMode) -> &'static dyn SceneStyle {
    match mode {
        ViewMode::Diagram => &DIAGRAM,
        ViewMode::Explore => &EXPLORE,
    }
}

const PAPER: Color = Color::srgb(0.97, 0.96, 0.92);
const INK: Color = Color::srgb(0.15, 0.15, 0.18);
const NIGHT: Color = Color::srgb(0.03, 0.04, 0.09);

impl SceneStyle for DiagramStyle {
    fn background(&self, surface: &mut dyn DrawSurface) {
        surface.clear(PAPER);
    }

    fn ground(&self, surface: &mut dyn DrawSurface, frame: FrameSize, ground_y: f64) {
        surface.line(NVec2::new(0.0, ground_y), NVec2::new(frame.width() as f64, ground_y), INK);
    }

    fn block(&self, surface: &mut dyn DrawSurface, min: NVec2, max: NVec2) {
        surface.rect(min, max, Color::srgb(0.85, 0.85, 0.85));
        outline_rect(surface, min, max, INK);
    }

    fn hammer(&self, surface: &mut dyn DrawSurface, center_x: f64, face_y: f64, s: f64) {
        let (min, max) = hammer_head(center_x, face_y, s);
        outline_rect(surface, min, max, INK);
        let (hmin, hmax) = hammer_handle(center_x, face_y, s);
        outline_rect(surface, hmin, hmax, INK);
    }

    fn body(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64, _kind: BodyKind) {
        surface.disc(center, radius, Color::srgb(0.80, 0.80, 0.80));
        surface.circle(center, radius, INK);
    }

    fn sky(&self, _surface: &mut dyn DrawSurface, _stars: &Starfield) {}

    fn orbit_path(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64) {
        surface.circle(center, radius, Color::srgb(0.70, 0.70, 0.70));
    }

    fn force_arrow(&self, surface: &mut dyn DrawSurface, arrow: &Arrow, role: ArrowRole, _label: &str, s: f64) {
        draw_arrow(surface, arrow, role.color(), s);
    }

    fn pair_annotations(&self, surface: &mut dyn DrawSurface, pair: &ForceVectorPair, names: (&str, &str), s: f64) {
        let size = text_size(s);
        let gap = 18.0 * s;
        let a = pair.arrow_a().label_anchor(gap);
        let b = pair.arrow_b().label_anchor(gap);
        surface.text(a, &format!("Action: {}", names.0), size, ACTION_COLOR);
        surface.text(b, &format!("Reaction: {}", names.1), size, REACTION_COLOR);
    }
}

impl SceneStyle for ExploreStyle {
    fn background(&self, surface: &mut dyn DrawSurface) {
        surface.clear(NIGHT);
    }

    fn ground(&self, surface: &mut dyn DrawSurface, frame: FrameSize, ground_y: f64) {
        let w = frame.width() as f64;
        surface.rect(NVec2::new(0.0, ground_y), NVec2::new(w, frame.height() as f64), Color::srgb(0.22, 0.17, 0.12));
        surface.line(NVec2::new(0.0, ground_y), NVec2::new(w, ground_y), Color::srgb(0.45, 0.36, 0.25));
        // hatching
        let mut x = 0.0;
        while x < w {
            surface.line(NVec2::new(x, ground_y + 4.0), NVec2::new(x + 10.0, ground_y + 14.0), Color::srgb(0.32, 0.25, 0.18));
            x += 24.0;
        }
    }

    fn block(&self, surface: &mut dyn DrawSurface, min: NVec2, max: NVec2) {
        surface.rect(min, max, Color::srgb(0.70, 0.50, 0.28));
        let grain = Color::srgb(0.58, 0.40, 0.21);
        let rows = 4;
        for i in 1..rows {
            let y = min.y + (max.y - min.y) * i as f64 / rows as f64;
            surface.line(NVec2::new(min.x + 4.0, y), NVec2::new(max.x - 4.0, y), grain);
        }
    }

    fn hammer(&self, surface: &mut dyn DrawSurface, center_x: f64, face_y: f64, s: f64) {
        let (hmin, hmax) = hammer_handle(center_x, face_y, s);
        surface.rect(hmin, hmax, Color::srgb(0.55, 0.36, 0.20));
        let (min, max) = hammer_head(center_x, face_y, s);
        surface.rect(min, max, Color::srgb(0.55, 0.58, 0.63));
        surface.rect(min, NVec2::new(max.x, min.y + 4.0 * s), Color::srgb(0.78, 0.80, 0.84));
    }

    fn body(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64, kind: BodyKind) {
        let (base, shine) = match kind {
            BodyKind::Primary => (Color::srgb(0.95, 0.70, 0.20), Color::srgb(1.0, 0.90, 0.60)),
            BodyKind::Secondary => (Color::srgb(0.25, 0.55, 0.85), Color::srgb(0.65, 0.85, 1.0)),
        };
        surface.disc(center, radius, base);
        // highlight towards the upper left
        surface.disc(center + NVec2::new(-0.3, -0.3) * radius, 0.35 * radius, shine);
    }

    fn sky(&self, surface: &mut dyn DrawSurface, stars: &Starfield) {
        for star in stars.stars() {
            let level = star.brightness;
            surface.disc(star.position, star.radius, Color::srgb(level, level, level));
        }
    }

    fn orbit_path(&self, surface: &mut dyn DrawSurface, center: NVec2, radius: f64) {
        surface.circle(center, radius, Color::srgba(0.6, 0.7, 0.9, 0.45));
    }

    fn force_arrow(&self, surface: &mut dyn DrawSurface, arrow: &Arrow, role: ArrowRole, label: &str, s: f64) {
        draw_arrow(surface, arrow, role.color(), s);
        if !label.is_empty() {
            surface.text(arrow.label_anchor(16.0 * s), label, text_size(s), role.color());
        }
    }

    fn pair_annotations(&self, _surface: &mut dyn DrawSurface, _pair: &ForceVectorPair, _names: (&str, &str), _s: f64) {}
}

// shared primitives ======================================================================

pub fn text_size(s: f64) -> f32 {
    (14.0 * s).clamp(11.0, 22.0) as f32
}

pub fn outline_rect(surface: &mut dyn DrawSurface, min: NVec2, max: NVec2, color: Color) {
    let tr = NVec2::new(max.x, min.y);
    let bl = NVec2::new(min.x, max.y);
    surface.line(min, tr, color);
    surface.line(tr, max, color);
    surface.line(max, bl, color);
    surface.line(bl, min, color);
}

/// Shaft plus filled head; zero-length arrows draw nothing
pub fn draw_arrow(surface: &mut dyn DrawSurface, arrow: &Arrow, color: Color, s: f64) {
    let length = arrow.length();
    let Some(head) = arrow.head(head_length(length, s)) else {
        return;
    };
    surface.line(arrow.origin, arrow.tip, color);
    surface.polygon(&head, color);
}

/// Emphasis drawn under a pair when highlight-pair is on
pub fn highlight_pair(surface: &mut dyn DrawSurface, pair: &ForceVectorPair, s: f64) {
    let halo = 6.0 * s;
    for arrow in [pair.arrow_a(), pair.arrow_b()] {
        surface.disc(arrow.origin, halo, HIGHLIGHT_COLOR);
        surface.circle(arrow.tip, halo, HIGHLIGHT_COLOR);
    }
    surface.line(pair.origin_a, pair.origin_b, HIGHLIGHT_COLOR);
}

fn hammer_head(center_x: f64, face_y: f64, s: f64) -> (NVec2, NVec2) {
    let half_w = 34.0 * s;
    let h = 30.0 * s;
    (NVec2::new(center_x - half_w, face_y - h), NVec2::new(center_x + half_w, face_y))
}

fn hammer_handle(center_x: f64, face_y: f64, s: f64) -> (NVec2, NVec2) {
    let half_w = 6.0 * s;
    let top = face_y - 30.0 * s - 90.0 * s;
    (NVec2::new(center_x - half_w, top), NVec2::new(center_x + half_w, face_y - 30.0 * s))
}
