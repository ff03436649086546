//! Background stars for the orbit scene.
//!
//! Positions come from a seeded ChaCha generator so the same seed and frame
//! size always give the same sky; the field is regenerated on resize.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::simulation::frame::FrameSize;
use crate::simulation::states::NVec2;

/// Stars per 10 000 square pixels
const DENSITY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: NVec2,
    pub radius: f64,
    pub brightness: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn generate(frame: FrameSize, seed: u64) -> Self {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let w = frame.width() as f64;
        let h = frame.height() as f64;
        let count = (w * h / 10_000.0 * DENSITY).round() as usize;

        let stars = (0..count)
            .map(|_| Star {
                position: NVec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h)),
                radius: rng.gen_range(0.4..1.6),
                brightness: rng.gen_range(0.35..1.0),
            })
            .collect();

        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
