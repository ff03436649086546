//! 2D drawing surface contract
//!
//! Scenes draw in canvas coordinates (origin top-left, y down, logical
//! pixels of the current `FrameSize`). Hosts translate into whatever
//! their backend needs; device pixel density is the host's concern.

use bevy::color::Color;

use crate::simulation::frame::FrameSize;
use crate::simulation::states::NVec2;

/// Immediate-mode drawing target, fully redrawn every tick
pub trait DrawSurface {
    /// Start a new frame; everything drawn before is discarded
    fn begin_frame(&mut self, size: FrameSize);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn line(&mut self, from: NVec2, to: NVec2, color: Color);

    /// Circle outline
    fn circle(&mut self, center: NVec2, radius: f64, color: Color);

    /// Filled circle
    fn disc(&mut self, center: NVec2, radius: f64, color: Color);

    /// Filled axis-aligned rectangle
    fn rect(&mut self, min: NVec2, max: NVec2, color: Color);

    /// Filled convex polygon
    fn polygon(&mut self, points: &[NVec2], color: Color);

    fn text(&mut self, at: NVec2, text: &str, size: f32, color: Color);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { color: Color },
    Line { from: NVec2, to: NVec2, color: Color },
    Circle { center: NVec2, radius: f64, color: Color },
    Disc { center: NVec2, radius: f64, color: Color },
    Rect { min: NVec2, max: NVec2, color: Color },
    Polygon { points: Vec<NVec2>, color: Color },
    Text { at: NVec2, text: String, size: f32, color: Color },
}

/// Surface that records calls instead of rasterizing them
///
/// Used by the headless host and to inspect what a scene draws.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: Option<FrameSize>,
    pub commands: Vec<DrawCommand>,
    pub frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn this frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn count<F: Fn(&DrawCommand) -> bool>(&self, pred: F) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_frame(&mut self, size: FrameSize) {
        self.size = Some(size);
        self.commands.clear();
        self.frames += 1;
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn line(&mut self, from: NVec2, to: NVec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn circle(&mut self, center: NVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn disc(&mut self, center: NVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Disc { center, radius, color });
    }

    fn rect(&mut self, min: NVec2, max: NVec2, color: Color) {
        self.commands.push(DrawCommand::Rect { min, max, color });
    }

    fn polygon(&mut self, points: &[NVec2], color: Color) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color });
    }

    fn text(&mut self, at: NVec2, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            size,
            color,
        });
    }
}
