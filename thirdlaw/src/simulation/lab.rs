//! The lab: both simulation instances plus the controls that drive them
//!
//! Only the active simulation's loop is live. Commands are routed to the
//! active instance; parameter setters target their own simulation
//! regardless of which one is on screen.

use std::fmt;

use bevy::prelude::Resource;

use crate::configuration::config::LabConfig;
use crate::simulation::contact::ContactSim;
use crate::simulation::forces::round_for_display;
use crate::simulation::frame::{FrameSize, SizeTracker};
use crate::simulation::instance::Instance;
use crate::simulation::orbit::OrbitSim;
use crate::simulation::params::{ContactParams, DisplayOptions, OrbitParams, SimulationKind, ViewMode};
use crate::simulation::scheduler::CancelToken;
use crate::simulation::states::{ContactPhase, ImpactResult};
use crate::visualization::surface::DrawSurface;

/// Bevy resource holding the whole interactive lab
#[derive(Resource, Debug)]
pub struct Lab {
    contact: Instance<ContactSim>,
    orbit: Instance<OrbitSim>,
    active: SimulationKind,
    tracker: SizeTracker,
    pub display: DisplayOptions,
}

impl Lab {
    /// Mount both simulations on `frame` and start the active one's loop
    pub fn new(contact: ContactSim, orbit: OrbitSim, frame: FrameSize, active: SimulationKind, mode: ViewMode, display: DisplayOptions) -> Self {
        let mut lab = Self {
            contact: Instance::mount(contact, frame, mode),
            orbit: Instance::mount(orbit, frame, mode),
            active,
            tracker: SizeTracker::new(),
            display,
        };
        lab.tracker.observe(Some((frame.width() as f64, frame.height() as f64)));
        lab.start_active();
        lab
    }

    pub fn from_config(cfg: &LabConfig) -> Self {
        let contact = ContactSim::new(ContactParams::new(cfg.contact.mass as i64, cfg.contact.speed as i64), cfg.contact.hold_ms);
        let orbit = OrbitSim::new(
            OrbitParams::new(cfg.orbit.primary_mass as i64, cfg.orbit.secondary_mass as i64, cfg.orbit.separation as i64),
            cfg.orbit.star_seed,
        );
        let frame = FrameSize::new(cfg.window.width, cfg.window.height);
        let mut lab = Self::new(contact, orbit, frame, cfg.start.simulation, cfg.start.view_mode, cfg.display);
        if cfg.orbit.paused {
            lab.orbit.sim_mut().pause();
        }
        lab
    }

    pub fn contact(&self) -> &Instance<ContactSim> {
        &self.contact
    }

    pub fn orbit(&self) -> &Instance<OrbitSim> {
        &self.orbit
    }

    pub fn active(&self) -> SimulationKind {
        self.active
    }

    pub fn frame_size(&self) -> FrameSize {
        match self.active {
            SimulationKind::Contact => self.contact.frame(),
            SimulationKind::Orbit => self.orbit.frame(),
        }
    }

    /// Token of the live loop, if the lab has not been shut down
    pub fn active_token(&self) -> Option<CancelToken> {
        match self.active {
            SimulationKind::Contact => self.contact.scheduler().token(),
            SimulationKind::Orbit => self.orbit.scheduler().token(),
        }
    }

    fn start_active(&mut self) {
        match self.active {
            SimulationKind::Contact => {
                self.orbit.suspend();
                self.contact.start();
            }
            SimulationKind::Orbit => {
                self.contact.suspend();
                self.orbit.start();
            }
        }
    }

    /// Show another simulation: the old loop is cancelled first
    pub fn switch_to(&mut self, kind: SimulationKind) {
        if kind == self.active && self.active_token().is_some() {
            return;
        }
        self.active = kind;
        self.start_active();
        log::info!("switched to {} simulation", kind);
    }

    pub fn toggle_simulation(&mut self) {
        self.switch_to(self.active.other());
    }

    /// Feed a host-box observation; a changed size resets both instances
    pub fn observe_surface(&mut self, observed: Option<(f64, f64)>) -> Option<FrameSize> {
        let frame = self.tracker.observe(observed)?;
        self.contact.resize(frame);
        self.orbit.resize(frame);
        Some(frame)
    }

    /// Run one tick of the active simulation against `surface`
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn DrawSurface) -> bool {
        let display = self.display;
        match self.active {
            SimulationKind::Contact => self.contact.tick(now_ms, surface, &display),
            SimulationKind::Orbit => self.orbit.tick(now_ms, surface, &display),
        }
    }

    /// Cancel every loop; nothing ticks afterwards
    pub fn shutdown(&mut self) {
        self.contact.suspend();
        self.orbit.suspend();
        log::info!("lab shut down");
    }

    // commands ===========================================================================

    pub fn strike(&mut self) -> bool {
        if self.active != SimulationKind::Contact {
            return false;
        }
        self.contact.sim_mut().strike()
    }

    pub fn pause(&mut self) {
        self.orbit.sim_mut().pause();
    }

    pub fn resume(&mut self) {
        self.orbit.sim_mut().resume();
    }

    pub fn toggle_pause(&mut self) {
        if self.orbit.sim().state().paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn reset(&mut self) {
        match self.active {
            SimulationKind::Contact => self.contact.reset(),
            SimulationKind::Orbit => self.orbit.reset(),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        match self.active {
            SimulationKind::Contact => self.contact.mode(),
            SimulationKind::Orbit => self.orbit.mode(),
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        match self.active {
            SimulationKind::Contact => self.contact.set_view_mode(mode),
            SimulationKind::Orbit => self.orbit.set_view_mode(mode),
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode().toggled());
    }

    // parameters ===========================================================================

    pub fn set_mass(&mut self, mass: i64) {
        self.contact.sim_mut().params.set_mass(mass);
    }

    pub fn set_speed(&mut self, speed: i64) {
        self.contact.sim_mut().params.set_speed(speed);
    }

    pub fn set_primary_mass(&mut self, mass: i64) {
        self.orbit.sim_mut().params.set_primary_mass(mass);
    }

    pub fn set_secondary_mass(&mut self, mass: i64) {
        self.orbit.sim_mut().params.set_secondary_mass(mass);
    }

    pub fn set_separation(&mut self, separation: i64) {
        self.orbit.sim_mut().params.set_separation(separation);
    }

    pub fn contact_params(&self) -> ContactParams {
        self.contact.sim().params
    }

    pub fn orbit_params(&self) -> OrbitParams {
        self.orbit.sim().params
    }

    /// Outbound snapshot for the display panel
    pub fn status(&self) -> LabStatus {
        let contact = self.contact.sim();
        let orbit = self.orbit.sim();
        let forces = orbit.forces();
        LabStatus {
            simulation: self.active,
            view_mode: self.view_mode(),
            frame: self.frame_size(),
            phase: contact.state().phase,
            holding: contact.state().is_holding(),
            impact: contact.impact(),
            expected_force: contact.expected_force(),
            contact_params: contact.params,
            orbit_params: orbit.params,
            angle_degrees: orbit.state().angle_radians.to_degrees(),
            elapsed_time: orbit.state().elapsed_time,
            paused: orbit.state().paused,
            gravity: round_for_display(forces.force),
            accel_primary: round_for_display(forces.accel_primary),
            accel_secondary: round_for_display(forces.accel_secondary),
        }
    }
}

/// Read-only snapshot of everything the display panels show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabStatus {
    pub simulation: SimulationKind,
    pub view_mode: ViewMode,
    pub frame: FrameSize,
    pub phase: ContactPhase,
    pub holding: bool,
    pub impact: ImpactResult,
    pub expected_force: f64,
    pub contact_params: ContactParams,
    pub orbit_params: OrbitParams,
    pub angle_degrees: f64,
    pub elapsed_time: f64,
    pub paused: bool,
    pub gravity: f64,
    pub accel_primary: f64,
    pub accel_secondary: f64,
}

impl fmt::Display for LabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {} | {}] ", self.simulation, self.view_mode, self.frame)?;
        match self.simulation {
            SimulationKind::Contact => {
                write!(
                    f,
                    "mass {} speed {} | phase {}{} | force {:.0} N{}",
                    self.contact_params.mass(),
                    self.contact_params.speed(),
                    self.phase,
                    if self.holding { " (hold)" } else { "" },
                    if self.impact.active { self.impact.force_magnitude } else { self.expected_force },
                    if self.impact.active { " acting" } else { "" },
                )
            }
            SimulationKind::Orbit => {
                write!(
                    f,
                    "m1 {} m2 {} r {} | F {:.2} | a1 {:.2} a2 {:.2} | angle {:.1} deg | t {:.1} s{}",
                    self.orbit_params.primary_mass(),
                    self.orbit_params.secondary_mass(),
                    self.orbit_params.separation(),
                    self.gravity,
                    self.accel_primary,
                    self.accel_secondary,
                    self.angle_degrees.rem_euclid(360.0),
                    self.elapsed_time,
                    if self.paused { " (paused)" } else { "" },
                )
            }
        }
    }
}
