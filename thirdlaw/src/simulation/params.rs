//! User-set parameters and presentation options
//!
//! Every setter clamps into the range the controls allow, so the core
//! never sees an out-of-range mass, speed or separation.

use std::fmt;

use serde::Deserialize;

pub const MASS_RANGE: (u32, u32) = (1, 10);
pub const SPEED_RANGE: (u32, u32) = (1, 10);
pub const SEPARATION_RANGE: (u32, u32) = (120, 350);

fn clamp_to(value: i64, (lo, hi): (u32, u32)) -> u32 {
    value.clamp(lo as i64, hi as i64) as u32
}

/// Inputs of the contact simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactParams {
    mass: u32,
    speed: u32,
}

impl ContactParams {
    pub fn new(mass: i64, speed: i64) -> Self {
        Self {
            mass: clamp_to(mass, MASS_RANGE),
            speed: clamp_to(speed, SPEED_RANGE),
        }
    }

    pub fn mass(&self) -> u32 {
        self.mass
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn set_mass(&mut self, mass: i64) {
        self.mass = clamp_to(mass, MASS_RANGE);
    }

    pub fn set_speed(&mut self, speed: i64) {
        self.speed = clamp_to(speed, SPEED_RANGE);
    }
}

impl Default for ContactParams {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

/// Inputs of the orbit simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitParams {
    primary_mass: u32,
    secondary_mass: u32,
    separation: u32,
}

impl OrbitParams {
    pub fn new(primary_mass: i64, secondary_mass: i64, separation: i64) -> Self {
        Self {
            primary_mass: clamp_to(primary_mass, MASS_RANGE),
            secondary_mass: clamp_to(secondary_mass, MASS_RANGE),
            separation: clamp_to(separation, SEPARATION_RANGE),
        }
    }

    pub fn primary_mass(&self) -> u32 {
        self.primary_mass
    }

    pub fn secondary_mass(&self) -> u32 {
        self.secondary_mass
    }

    pub fn separation(&self) -> u32 {
        self.separation
    }

    pub fn set_primary_mass(&mut self, mass: i64) {
        self.primary_mass = clamp_to(mass, MASS_RANGE);
    }

    pub fn set_secondary_mass(&mut self, mass: i64) {
        self.secondary_mass = clamp_to(mass, MASS_RANGE);
    }

    pub fn set_separation(&mut self, separation: i64) {
        self.separation = clamp_to(separation, SEPARATION_RANGE);
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self::new(6, 3, 220)
    }
}

/// Presentation mode of a simulation instance
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[serde(rename = "diagram")] // frozen textbook pose, static annotations
    Diagram,

    #[default]
    #[serde(rename = "explore")] // time-evolving and interactive
    Explore,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Diagram => ViewMode::Explore,
            ViewMode::Explore => ViewMode::Diagram,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Diagram => f.write_str("diagram"),
            ViewMode::Explore => f.write_str("explore"),
        }
    }
}

/// Renderer-only toggles; none of these touch the physics
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_orbit_path: bool,
    pub show_acceleration: bool,
    pub highlight_pair: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_orbit_path: true,
            show_acceleration: false,
            highlight_pair: false,
        }
    }
}

/// Which of the two simulations is on screen
#[derive(Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationKind {
    #[default]
    #[serde(rename = "contact")] // hammer and block
    Contact,

    #[serde(rename = "orbit")] // gravitational pair
    Orbit,
}

impl SimulationKind {
    pub fn other(self) -> Self {
        match self {
            SimulationKind::Contact => SimulationKind::Orbit,
            SimulationKind::Orbit => SimulationKind::Contact,
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationKind::Contact => f.write_str("contact"),
            SimulationKind::Orbit => f.write_str("orbit"),
        }
    }
}
