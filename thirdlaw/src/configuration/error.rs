//! Errors raised while loading a lab configuration.
//!
//! The simulation core itself never fails; only the application edge
//! (reading and validating YAML) reports errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scenario file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scenario file is not valid YAML for [`LabConfig`](super::config::LabConfig).
    #[error("invalid scenario YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value lies outside the range the controls allow.
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
