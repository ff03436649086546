//! Core state types for both simulations.
//!
//! - `ContactState` / `ImpactResult` for the strike (hammer on block)
//! - `OrbitState` for the gravitational pair
//!
//! Positions are canvas coordinates in `NVec2` (origin top-left, y down).

use std::fmt;

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Phase of a single strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactPhase {
    #[default]
    Idle,
    Descending,
    Contact,
    Rising,
}

impl ContactPhase {
    pub fn label(self) -> &'static str {
        match self {
            ContactPhase::Idle => "idle",
            ContactPhase::Descending => "descending",
            ContactPhase::Contact => "contact",
            ContactPhase::Rising => "rising",
        }
    }
}

impl fmt::Display for ContactPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A hold at the moment of contact, released once `due_ms` has passed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldRelease {
    pub due_ms: f64,
}

/// Evolving strike state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactState {
    pub phase: ContactPhase,
    pub striker_y: f64, // striker face (lower edge)
    pub target_y: f64, // target top surface
    pub hold_target_y: f64, // where the target surface ends up after penetration
    pub contact_frame_count: u32, // ticks spent resolving the contact
    pub sampled_force: f64, // force frozen for the current strike
    pub hold: Option<HoldRelease>, // pending release, if holding
    pub initialized: bool, // false until laid out against a frame
}

/// Snapshot published every tick for the display panels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImpactResult {
    pub force_magnitude: f64,
    pub active: bool,
}

impl ContactState {
    pub fn impact(&self) -> ImpactResult {
        ImpactResult {
            force_magnitude: self.sampled_force,
            active: self.phase == ContactPhase::Contact,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }
}

/// Evolving orbit state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitState {
    pub angle_radians: f64,
    pub elapsed_time: f64, // seconds of unpaused explore time
    pub paused: bool,
}
