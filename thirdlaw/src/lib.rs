pub mod simulation;
pub mod configuration;
pub mod visualization;

pub use simulation::states::{ContactPhase, ContactState, ImpactResult, OrbitState, NVec2};
pub use simulation::params::{ContactParams, OrbitParams, ViewMode, DisplayOptions, SimulationKind};
pub use simulation::forces::{impact_force, gravity, acceleration};
pub use simulation::frame::{FrameSize, SizeTracker};
pub use simulation::contact::ContactSim;
pub use simulation::orbit::OrbitSim;
pub use simulation::lab::{Lab, LabStatus};

pub use configuration::config::{LabConfig, load_config};
pub use configuration::error::ConfigError;

pub use visualization::{lab_vis2d::run_2d, headless::{run_headless, HeadlessOptions, HeadlessReport}};
