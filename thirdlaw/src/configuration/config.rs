//! Configuration types for loading a lab setup from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of the
//! lab. A configuration consists of:
//!
//! - [`WindowConfig`]  – initial window size and title
//! - [`StartConfig`]   – which simulation is shown first, and in which mode
//! - [`ContactConfig`] – hammer mass/speed and the contact hold duration
//! - [`OrbitConfig`]   – masses, separation and starfield seed
//! - [`DisplayOptions`] – renderer-only toggles
//! - [`LabConfig`]     – top-level wrapper
//!
//! # YAML format
//! Every section and field is optional; missing values take the defaults
//! shown here:
//!
//! ```yaml
//! window:
//!   width: 960
//!   height: 640
//!   title: "Newton's Third Law"
//!
//! start:
//!   simulation: contact     # or "orbit"
//!   view_mode: explore      # or "diagram"
//!
//! contact:
//!   mass: 5                 # 1..=10
//!   speed: 5                # 1..=10
//!   hold_ms: 3000.0         # freeze at impact, 0 disables
//!
//! orbit:
//!   primary_mass: 6         # 1..=10
//!   secondary_mass: 3       # 1..=10
//!   separation: 220         # 120..=350
//!   paused: false
//!   star_seed: 7
//!
//! display:
//!   show_orbit_path: true
//!   show_acceleration: false
//!   highlight_pair: false
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::configuration::error::{ConfigError, ConfigResult};
use crate::simulation::contact::DEFAULT_HOLD_MS;
use crate::simulation::frame::MIN_FRAME_SIDE;
use crate::simulation::params::{DisplayOptions, SimulationKind, ViewMode, MASS_RANGE, SEPARATION_RANGE, SPEED_RANGE};

const MAX_WINDOW_SIDE: u32 = 8192;
const MAX_HOLD_MS: f64 = 10_000.0;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 640,
            title: "Newton's Third Law".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StartConfig {
    pub simulation: SimulationKind,
    pub view_mode: ViewMode,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ContactConfig {
    pub mass: u32,
    pub speed: u32,
    pub hold_ms: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            mass: 5,
            speed: 5,
            hold_ms: DEFAULT_HOLD_MS,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OrbitConfig {
    pub primary_mass: u32,
    pub secondary_mass: u32,
    pub separation: u32,
    pub paused: bool,
    pub star_seed: u64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            primary_mass: 6,
            secondary_mass: 3,
            separation: 220,
            paused: false,
            star_seed: 7,
        }
    }
}

/// Top-level lab configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LabConfig {
    pub window: WindowConfig,
    pub start: StartConfig,
    pub contact: ContactConfig,
    pub orbit: OrbitConfig,
    pub display: DisplayOptions,
}

impl LabConfig {
    /// Parse and validate a configuration from YAML text
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let cfg: LabConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the controls could never produce
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("window.width", self.window.width as f64, (MIN_FRAME_SIDE, MAX_WINDOW_SIDE))?;
        check_range("window.height", self.window.height as f64, (MIN_FRAME_SIDE, MAX_WINDOW_SIDE))?;
        check_range("contact.mass", self.contact.mass as f64, MASS_RANGE)?;
        check_range("contact.speed", self.contact.speed as f64, SPEED_RANGE)?;
        check_range("orbit.primary_mass", self.orbit.primary_mass as f64, MASS_RANGE)?;
        check_range("orbit.secondary_mass", self.orbit.secondary_mass as f64, MASS_RANGE)?;
        check_range("orbit.separation", self.orbit.separation as f64, SEPARATION_RANGE)?;

        if !(0.0..=MAX_HOLD_MS).contains(&self.contact.hold_ms) {
            return Err(ConfigError::OutOfRange {
                field: "contact.hold_ms",
                value: self.contact.hold_ms,
                min: 0.0,
                max: MAX_HOLD_MS,
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (u32, u32)) -> ConfigResult<()> {
    if value < min as f64 || value > max as f64 {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

/// Read, parse and validate a configuration file
pub fn load_config(path: &Path) -> ConfigResult<LabConfig> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let cfg: LabConfig = serde_yaml::from_reader(reader)?;
    cfg.validate()?;
    Ok(cfg)
}
