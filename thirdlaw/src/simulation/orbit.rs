//! Orbit simulation: a secondary body circling a primary
//!
//! The angular speed is a hand-tuned function of separation (closer bodies
//! orbit faster) rather than an integration of the computed force. That
//! keeps the path circular and bounded on screen; the force and the
//! accelerations are computed for display only.

use crate::simulation::forces::{acceleration, gravity};
use crate::simulation::frame::FrameSize;
use crate::simulation::params::{OrbitParams, ViewMode, SEPARATION_RANGE};
use crate::simulation::states::{NVec2, OrbitState};
use crate::simulation::starfield::Starfield;

/// Angular step at the widest separation, radians per tick
pub const BASE_ANGULAR_SPEED: f64 = 0.01;

/// Extra angular step gained as the separation shrinks to its floor
pub const MAX_DISTANCE_CORRECTION: f64 = 0.03;

/// Screen margin kept around the orbit path, reference pixels
const ORBIT_MARGIN: f64 = 36.0;

/// Clear space always left between the two bodies, reference pixels
pub const MIN_BODY_GAP: f64 = 40.0;

/// Extra radians per tick for a given separation, 0 at the widest
pub fn distance_correction(separation: f64) -> f64 {
    let (lo, hi) = (SEPARATION_RANGE.0 as f64, SEPARATION_RANGE.1 as f64);
    let t = ((hi - separation) / (hi - lo)).clamp(0.0, 1.0);
    MAX_DISTANCE_CORRECTION * t
}

pub fn angular_step(separation: f64) -> f64 {
    BASE_ANGULAR_SPEED + distance_correction(separation)
}

/// Advance the orbit by one tick of `dt_ms`
///
/// Diagram mode and pause both freeze the angle and the elapsed time.
pub fn step_orbit(state: &mut OrbitState, params: &OrbitParams, mode: ViewMode, dt_ms: f64) {
    if mode == ViewMode::Diagram || state.paused {
        return;
    }
    state.angle_radians += angular_step(params.separation() as f64);
    state.elapsed_time += dt_ms.max(0.0) / 1000.0;
}

/// Force and per-body accelerations for one parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitForces {
    pub force: f64,
    pub accel_primary: f64,
    pub accel_secondary: f64,
}

impl OrbitForces {
    pub fn from_params(params: &OrbitParams) -> Self {
        let m1 = params.primary_mass() as f64;
        let m2 = params.secondary_mass() as f64;
        let force = gravity(m1, m2, params.separation() as f64);
        Self {
            force,
            accel_primary: acceleration(force, m1),
            accel_secondary: acceleration(force, m2),
        }
    }
}

/// Screen placement of the two bodies for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLayout {
    pub scale: f64,
    pub primary: NVec2,
    pub secondary: NVec2,
    pub path_radius: f64,
    pub primary_radius: f64,
    pub secondary_radius: f64,
}

impl OrbitLayout {
    /// Place the bodies; `angle` of `None` pins the secondary on the
    /// horizontal offset to the right of the primary
    pub fn new(frame: FrameSize, params: &OrbitParams, angle: Option<f64>) -> Self {
        let s = frame.scale();
        let primary = NVec2::new(0.5 * frame.width() as f64, 0.5 * frame.height() as f64);
        let half_side = 0.5 * frame.width().min(frame.height()) as f64;
        let px_per_unit = (half_side - ORBIT_MARGIN * s) / SEPARATION_RANGE.1 as f64;
        let path_radius = params.separation() as f64 * px_per_unit;
        let a = angle.unwrap_or(0.0);
        let secondary = primary + NVec2::new(a.cos(), a.sin()) * path_radius;

        // heavy bodies at close range shrink so the force pair stays visible
        let primary_radius = (14.0 + 2.5 * params.primary_mass() as f64) * s;
        let secondary_radius = (8.0 + 2.0 * params.secondary_mass() as f64) * s;
        let room = (path_radius - MIN_BODY_GAP * s).max(0.0);
        let shrink = (room / (primary_radius + secondary_radius)).min(1.0);

        Self {
            scale: s,
            primary,
            secondary,
            path_radius,
            primary_radius: primary_radius * shrink,
            secondary_radius: secondary_radius * shrink,
        }
    }

    /// Clear distance between the facing edges of the bodies
    pub fn gap(&self) -> f64 {
        self.path_radius - self.primary_radius - self.secondary_radius
    }
}

/// Orbit simulation instance state
#[derive(Debug, Clone)]
pub struct OrbitSim {
    pub params: OrbitParams,
    state: OrbitState,
    stars: Starfield,
    star_seed: u64,
}

impl OrbitSim {
    pub fn new(params: OrbitParams, star_seed: u64) -> Self {
        Self {
            params,
            state: OrbitState::default(),
            stars: Starfield::default(),
            star_seed,
        }
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn stars(&self) -> &Starfield {
        &self.stars
    }

    pub fn forces(&self) -> OrbitForces {
        OrbitForces::from_params(&self.params)
    }

    pub fn layout(&self, frame: FrameSize, mode: ViewMode) -> OrbitLayout {
        let angle = match mode {
            ViewMode::Diagram => None,
            ViewMode::Explore => Some(self.state.angle_radians),
        };
        OrbitLayout::new(frame, &self.params, angle)
    }

    pub fn pause(&mut self) {
        self.state.paused = true;
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    /// Return to angle 0, no elapsed time, running; regenerate the sky
    pub fn reset(&mut self, frame: FrameSize) {
        self.state = OrbitState::default();
        self.stars = Starfield::generate(frame, self.star_seed);
    }

    /// Reset for a new surface size, keeping the pause set by the user
    pub fn relayout(&mut self, frame: FrameSize) {
        let paused = self.state.paused;
        self.reset(frame);
        self.state.paused = paused;
    }

    pub fn advance(&mut self, mode: ViewMode, dt_ms: f64) {
        step_orbit(&mut self.state, &self.params, mode, dt_ms);
    }
}
