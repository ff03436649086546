//! Action–reaction vector pairs
//!
//! A pair is built from a single magnitude through a single clamped
//! mapping, and that one length is applied to both arrows. The two arrows
//! are never sized separately, so they cannot disagree.

use crate::simulation::states::NVec2;

/// Half-angle of every arrow head
pub const HEAD_HALF_ANGLE: f64 = std::f64::consts::PI / 7.0;

/// Maps a force magnitude to an on-screen arrow length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowScale {
    pub per_unit: f64, // pixels per unit of force
    pub cap: f64, // longest arrow, pixels
    pub floor: f64, // shortest arrow for a non-zero force, pixels
}

impl ArrowScale {
    pub fn new(per_unit: f64, cap: f64) -> Self {
        Self { per_unit, cap, floor: 0.0 }
    }

    /// Keep any non-zero force at least `floor` pixels long (never past `cap`)
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// `clamp(magnitude * per_unit, floor, cap)`; 0 for a zero or
    /// non-finite magnitude
    pub fn length(&self, magnitude: f64) -> f64 {
        let raw = magnitude * self.per_unit;
        if !raw.is_finite() || raw <= 0.0 {
            return 0.0;
        }
        let cap = self.cap.max(0.0);
        raw.clamp(self.floor.clamp(0.0, cap), cap)
    }
}

/// One action–reaction pair ready to draw
///
/// Arrow A starts at `origin_a` and points along the given direction;
/// arrow B starts at `origin_b` and points the opposite way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceVectorPair {
    pub origin_a: NVec2,
    pub end_a: NVec2,
    pub origin_b: NVec2,
    pub end_b: NVec2,
    pub magnitude: f64,
    pub length: f64,
}

impl ForceVectorPair {
    pub fn new(magnitude: f64, origin_a: NVec2, direction_a: NVec2, origin_b: NVec2, scale: &ArrowScale) -> Self {
        let length = scale.length(magnitude);
        let dir = direction_a.try_normalize(1e-12).unwrap_or_else(NVec2::zeros);
        let offset = dir * length;
        Self {
            origin_a,
            end_a: origin_a + offset,
            origin_b,
            end_b: origin_b - offset,
            magnitude,
            length,
        }
    }

    pub fn arrow_a(&self) -> Arrow {
        Arrow::new(self.origin_a, self.end_a)
    }

    pub fn arrow_b(&self) -> Arrow {
        Arrow::new(self.origin_b, self.end_b)
    }
}

/// Shaft plus triangular head
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub origin: NVec2,
    pub tip: NVec2,
}

impl Arrow {
    pub fn new(origin: NVec2, tip: NVec2) -> Self {
        Self { origin, tip }
    }

    pub fn length(&self) -> f64 {
        (self.tip - self.origin).norm()
    }

    /// Unit direction, `None` for a zero-length arrow
    pub fn direction(&self) -> Option<NVec2> {
        (self.tip - self.origin).try_normalize(1e-12)
    }

    /// Head triangle `[tip, left, right]` with legs of `head_len`
    pub fn head(&self, head_len: f64) -> Option<[NVec2; 3]> {
        let dir = self.direction()?;
        let back = -dir * head_len;
        let (sin, cos) = HEAD_HALF_ANGLE.sin_cos();
        let rotate = |v: NVec2, s: f64| NVec2::new(v.x * cos - v.y * s, v.x * s + v.y * cos);
        Some([self.tip, self.tip + rotate(back, sin), self.tip + rotate(back, -sin)])
    }

    /// Point beside the shaft midpoint, `gap` pixels to its left-hand side
    pub fn label_anchor(&self, gap: f64) -> NVec2 {
        let mid = 0.5 * (self.origin + self.tip);
        match self.direction() {
            Some(dir) => mid + NVec2::new(dir.y, -dir.x) * gap,
            None => mid + NVec2::new(gap, 0.0),
        }
    }
}

/// Head size used for an arrow of `length` at scene scale `s`
pub fn head_length(length: f64, s: f64) -> f64 {
    (12.0 * s).min(0.45 * length)
}
