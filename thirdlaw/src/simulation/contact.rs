//! Contact simulation: a hammer strikes a penetrable block
//!
//! One strike runs idle -> descending -> contact -> rising -> idle, with at
//! most one phase change per tick. On entering contact the impact force is
//! sampled once and frozen for the rest of the strike. An optional hold
//! keeps the scene frozen at the moment of impact; it is stored in the
//! state as a scheduled release, so replacing the state cancels it.

use crate::simulation::forces::impact_force;
use crate::simulation::frame::FrameSize;
use crate::simulation::params::{ContactParams, ViewMode};
use crate::simulation::states::{ContactPhase, ContactState, HoldRelease, ImpactResult};

/// Default length of the freeze at the moment of contact
pub const DEFAULT_HOLD_MS: f64 = 3000.0;

/// Ticks spent resolving a contact after the hold
pub const CONTACT_TICKS: u32 = 30;

/// Penetration is `min(DEPTH_CAP, force / DEPTH_DIVISOR)` reference pixels
pub const DEPTH_CAP: f64 = 28.0;
pub const DEPTH_DIVISOR: f64 = 40.0;

/// Scale-relative layout of the contact scene for one frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    pub scale: f64,
    pub center_x: f64,
    pub ground_y: f64,
    pub target_rest_y: f64, // block top surface at rest
    pub striker_rest_y: f64, // hammer face at rest
}

impl ContactGeometry {
    pub fn for_frame(frame: FrameSize) -> Self {
        let s = frame.scale();
        let ground_y = 0.78 * frame.height() as f64;
        let target_rest_y = ground_y - 70.0 * s;
        Self {
            scale: s,
            center_x: 0.5 * frame.width() as f64,
            ground_y,
            target_rest_y,
            striker_rest_y: target_rest_y - 170.0 * s,
        }
    }

    /// Per-tick descent of the striker, faster for higher speed settings
    pub fn descent_step(&self, speed: u32) -> f64 {
        (2.0 + 0.9 * speed as f64) * self.scale
    }

    pub fn rise_step(&self) -> f64 {
        3.0 * self.scale
    }

    pub fn penetration_step(&self) -> f64 {
        1.5 * self.scale
    }

    /// How far the block gives under a given force
    pub fn penetration_depth(&self, force: f64) -> f64 {
        (force / DEPTH_DIVISOR).min(DEPTH_CAP) * self.scale
    }
}

impl ContactState {
    /// Canonical initial state: idle, both bodies at rest, no hold pending
    pub fn at_rest(geometry: &ContactGeometry) -> Self {
        Self {
            phase: ContactPhase::Idle,
            striker_y: geometry.striker_rest_y,
            target_y: geometry.target_rest_y,
            hold_target_y: geometry.target_rest_y,
            contact_frame_count: 0,
            sampled_force: 0.0,
            hold: None,
            initialized: true,
        }
    }
}

/// Advance the strike by one tick
///
/// Returns the phase entered this tick, if any. Diagram mode is handled by
/// [`pin_diagram_pose`] instead.
pub fn step_contact(state: &mut ContactState, params: &ContactParams, geometry: &ContactGeometry, hold_ms: f64, now_ms: f64) -> Option<ContactPhase> {
    if !state.initialized {
        *state = ContactState::at_rest(geometry);
    }

    match state.phase {
        ContactPhase::Idle => None,
        ContactPhase::Descending => {
            state.striker_y += geometry.descent_step(params.speed());
            if state.striker_y < state.target_y {
                return None;
            }
            state.striker_y = state.target_y;
            enter_contact(state, params, geometry, hold_ms, now_ms);
            Some(ContactPhase::Contact)
        }
        ContactPhase::Contact => {
            if let Some(hold) = state.hold {
                if now_ms < hold.due_ms {
                    return None;
                }
                state.hold = None;
            }

            state.target_y = (state.target_y + geometry.penetration_step()).min(state.hold_target_y);
            state.striker_y = state.target_y;
            state.contact_frame_count += 1;

            if state.contact_frame_count > CONTACT_TICKS {
                state.phase = ContactPhase::Rising;
                return Some(ContactPhase::Rising);
            }
            None
        }
        ContactPhase::Rising => {
            state.striker_y -= geometry.rise_step();
            if state.striker_y > geometry.striker_rest_y {
                return None;
            }
            // the dented block is swapped for a fresh one
            state.striker_y = geometry.striker_rest_y;
            state.target_y = geometry.target_rest_y;
            state.hold_target_y = geometry.target_rest_y;
            state.contact_frame_count = 0;
            state.sampled_force = 0.0;
            state.phase = ContactPhase::Idle;
            Some(ContactPhase::Idle)
        }
    }
}

fn enter_contact(state: &mut ContactState, params: &ContactParams, geometry: &ContactGeometry, hold_ms: f64, now_ms: f64) {
    let force = impact_force(params.mass(), params.speed());
    state.phase = ContactPhase::Contact;
    state.sampled_force = force;
    state.contact_frame_count = 0;
    state.hold_target_y = state.target_y + geometry.penetration_depth(force);
    state.hold = (hold_ms > 0.0).then(|| HoldRelease { due_ms: now_ms + hold_ms });
}

/// Force the canonical textbook pose: hammer resting on the intact block,
/// contact active with the force of the current parameters
pub fn pin_diagram_pose(state: &mut ContactState, params: &ContactParams, geometry: &ContactGeometry) {
    state.phase = ContactPhase::Contact;
    state.striker_y = geometry.target_rest_y;
    state.target_y = geometry.target_rest_y;
    state.hold_target_y = geometry.target_rest_y;
    state.contact_frame_count = 0;
    state.sampled_force = impact_force(params.mass(), params.speed());
    state.hold = None;
    state.initialized = true;
}

/// Contact simulation instance state: parameters, layout and strike state
#[derive(Debug, Clone)]
pub struct ContactSim {
    pub params: ContactParams,
    hold_ms: f64,
    geometry: ContactGeometry,
    state: ContactState,
}

impl ContactSim {
    pub fn new(params: ContactParams, hold_ms: f64) -> Self {
        Self {
            params,
            hold_ms: hold_ms.max(0.0),
            geometry: ContactGeometry::for_frame(FrameSize::default()),
            state: ContactState::default(),
        }
    }

    pub fn state(&self) -> &ContactState {
        &self.state
    }

    pub fn geometry(&self) -> &ContactGeometry {
        &self.geometry
    }

    pub fn hold_ms(&self) -> f64 {
        self.hold_ms
    }

    pub fn impact(&self) -> ImpactResult {
        self.state.impact()
    }

    /// Force the current parameters would produce on the next strike
    pub fn expected_force(&self) -> f64 {
        impact_force(self.params.mass(), self.params.speed())
    }

    /// Start a strike; ignored unless idle
    pub fn strike(&mut self) -> bool {
        if !self.state.initialized || self.state.phase != ContactPhase::Idle {
            log::trace!("strike ignored in phase {}", self.state.phase);
            return false;
        }
        self.state.phase = ContactPhase::Descending;
        log::debug!("contact phase -> {}", ContactPhase::Descending);
        true
    }

    /// Lay out against `frame` and return to idle, dropping any pending hold
    pub fn reset(&mut self, frame: FrameSize) {
        self.geometry = ContactGeometry::for_frame(frame);
        self.state = ContactState::at_rest(&self.geometry);
    }

    /// Drop a strike in progress, pending hold included, and return to idle
    pub fn abandon_strike(&mut self) {
        if self.state.phase != ContactPhase::Idle || self.state.is_holding() {
            log::debug!("strike abandoned in phase {}", self.state.phase);
        }
        self.state = ContactState::at_rest(&self.geometry);
    }

    pub fn advance(&mut self, mode: ViewMode, now_ms: f64) -> Option<ContactPhase> {
        match mode {
            ViewMode::Diagram => {
                pin_diagram_pose(&mut self.state, &self.params, &self.geometry);
                None
            }
            ViewMode::Explore => {
                let entered = step_contact(&mut self.state, &self.params, &self.geometry, self.hold_ms, now_ms);
                if let Some(phase) = entered {
                    log::debug!("contact phase -> {} (force {})", phase, self.state.sampled_force);
                }
                entered
            }
        }
    }

    pub fn mode_changed(&mut self, mode: ViewMode) {
        match mode {
            ViewMode::Diagram => pin_diagram_pose(&mut self.state, &self.params, &self.geometry),
            // leave the pinned pose behind and wait for a fresh strike
            ViewMode::Explore => self.state = ContactState::at_rest(&self.geometry),
        }
    }
}
