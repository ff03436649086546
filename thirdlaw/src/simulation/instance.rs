//! A mounted simulation: its state, frame size, view mode and frame loop
//!
//! Each tick runs "advance one step, then redraw the whole surface", and
//! only while the instance's own loop is live.

use crate::simulation::contact::ContactSim;
use crate::simulation::frame::FrameSize;
use crate::simulation::orbit::OrbitSim;
use crate::simulation::params::{DisplayOptions, ViewMode};
use crate::simulation::scheduler::{CancelToken, FrameScheduler};
use crate::visualization::contact_scene::draw_contact_scene;
use crate::visualization::orbit_scene::draw_orbit_scene;
use crate::visualization::surface::DrawSurface;

/// Timing handed to a simulation on each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub now_ms: f64,
    pub dt_ms: f64,
}

/// What a simulation must provide to be driven by an [`Instance`]
pub trait Simulation {
    const NAME: &'static str;

    /// Return to canonical initial state laid out against `frame`
    fn reset(&mut self, frame: FrameSize);

    /// Lay out against a new surface size; a full reset unless the
    /// simulation keeps some user state across resizes
    fn resize(&mut self, frame: FrameSize) {
        self.reset(frame);
    }

    /// The loop was cancelled: drop anything scheduled against the clock
    fn suspended(&mut self);

    fn advance(&mut self, tick: Tick, mode: ViewMode);

    fn mode_changed(&mut self, mode: ViewMode);

    fn draw(&self, surface: &mut dyn DrawSurface, frame: FrameSize, mode: ViewMode, display: &DisplayOptions);
}

impl Simulation for ContactSim {
    const NAME: &'static str = "contact";

    fn reset(&mut self, frame: FrameSize) {
        ContactSim::reset(self, frame);
    }

    fn suspended(&mut self) {
        ContactSim::abandon_strike(self);
    }

    fn advance(&mut self, tick: Tick, mode: ViewMode) {
        ContactSim::advance(self, mode, tick.now_ms);
    }

    fn mode_changed(&mut self, mode: ViewMode) {
        ContactSim::mode_changed(self, mode);
    }

    fn draw(&self, surface: &mut dyn DrawSurface, frame: FrameSize, mode: ViewMode, display: &DisplayOptions) {
        draw_contact_scene(surface, self, frame, mode, display);
    }
}

impl Simulation for OrbitSim {
    const NAME: &'static str = "orbit";

    fn reset(&mut self, frame: FrameSize) {
        OrbitSim::reset(self, frame);
    }

    fn resize(&mut self, frame: FrameSize) {
        OrbitSim::relayout(self, frame);
    }

    // the stored angle survives a tab switch
    fn suspended(&mut self) {}

    fn advance(&mut self, tick: Tick, mode: ViewMode) {
        OrbitSim::advance(self, mode, tick.dt_ms);
    }

    // the stored angle survives a trip through diagram mode
    fn mode_changed(&mut self, _mode: ViewMode) {}

    fn draw(&self, surface: &mut dyn DrawSurface, frame: FrameSize, mode: ViewMode, display: &DisplayOptions) {
        draw_orbit_scene(surface, self, frame, mode, display);
    }
}

#[derive(Debug)]
pub struct Instance<S> {
    sim: S,
    frame: FrameSize,
    mode: ViewMode,
    scheduler: FrameScheduler,
    last_tick_ms: Option<f64>,
}

impl<S: Simulation> Instance<S> {
    /// Mount `sim` on a surface of `frame`; the loop is not started yet
    pub fn mount(mut sim: S, frame: FrameSize, mode: ViewMode) -> Self {
        sim.reset(frame);
        if mode == ViewMode::Diagram {
            sim.mode_changed(mode);
        }
        Self {
            sim,
            frame,
            mode,
            scheduler: FrameScheduler::new(),
            last_tick_ms: None,
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Start (or restart) this instance's frame loop
    pub fn start(&mut self) -> CancelToken {
        self.last_tick_ms = None;
        self.scheduler.start()
    }

    /// Cancel the loop along with any pending timed transition
    pub fn suspend(&mut self) {
        self.scheduler.cancel();
        self.last_tick_ms = None;
        self.sim.suspended();
        if self.mode == ViewMode::Diagram {
            self.sim.mode_changed(self.mode);
        }
    }

    /// Apply a new surface size: the running loop is cancelled, the state
    /// is rebuilt for the new geometry and the loop restarted
    pub fn resize(&mut self, frame: FrameSize) {
        if frame == self.frame {
            return;
        }
        let was_running = self.is_running();
        self.suspend();
        self.frame = frame;
        self.sim.resize(frame);
        if self.mode == ViewMode::Diagram {
            self.sim.mode_changed(self.mode);
        }
        log::info!("{} resized to {}", S::NAME, frame);
        if was_running {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.sim.reset(self.frame);
        if self.mode == ViewMode::Diagram {
            self.sim.mode_changed(self.mode);
        }
        log::info!("{} reset", S::NAME);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.sim.mode_changed(mode);
        log::info!("{} view mode -> {}", S::NAME, mode);
    }

    /// Advance one step and redraw, if the loop is live
    ///
    /// Returns whether a tick actually ran.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn DrawSurface, display: &DisplayOptions) -> bool {
        if !self.is_running() {
            return false;
        }
        let dt_ms = self.last_tick_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_tick_ms = Some(now_ms);

        self.sim.advance(Tick { now_ms, dt_ms }, self.mode);
        surface.begin_frame(self.frame);
        self.sim.draw(surface, self.frame, self.mode, display);
        true
    }
}
