//! Drawing surface size and the tracker that observes it

use std::fmt;

pub const MIN_FRAME_SIDE: u32 = 320;

/// Side length the scene geometry is designed against; `scale()` is 1.0 here
pub const REFERENCE_SIDE: f64 = 480.0;

/// Clamped size of the drawing surface in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Build a frame size, clamping each side to at least [`MIN_FRAME_SIDE`]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_FRAME_SIDE),
            height: height.max(MIN_FRAME_SIDE),
        }
    }

    /// Clamp a raw observation: `max(320, floor(side))`
    ///
    /// Returns `None` for non-finite input so a broken measurement is
    /// treated like a missing host.
    pub fn from_observed(width: f64, height: f64) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() {
            return None;
        }
        let side = |v: f64| v.floor().clamp(0.0, u32::MAX as f64) as u32;
        Some(Self::new(side(width), side(height)))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Geometry scale factor relative to [`REFERENCE_SIDE`]
    pub fn scale(&self) -> f64 {
        self.width.min(self.height) as f64 / REFERENCE_SIDE
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(MIN_FRAME_SIDE, MIN_FRAME_SIDE)
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Observes the host's content box and reports clamped size changes
#[derive(Debug, Clone, Default)]
pub struct SizeTracker {
    current: Option<FrameSize>,
}

impl SizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one observation of the host box
    ///
    /// `None` means there is no host element; that is a no-op. Returns the
    /// new size only when the clamped size actually changed, which callers
    /// treat as a reset signal.
    pub fn observe(&mut self, observed: Option<(f64, f64)>) -> Option<FrameSize> {
        let (width, height) = observed?;
        let size = FrameSize::from_observed(width, height)?;
        if self.current == Some(size) {
            return None;
        }
        log::debug!("surface size {} -> {}", self.current.map_or_else(|| "none".to_string(), |s| s.to_string()), size);
        self.current = Some(size);
        Some(size)
    }

    pub fn current(&self) -> Option<FrameSize> {
        self.current
    }
}
