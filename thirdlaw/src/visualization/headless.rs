//! Headless host: drives the lab at a fixed cadence without a window
//!
//! Frames are recorded rather than rasterized. Useful for scripted demos
//! and for checking the simulations from a terminal.

use crate::configuration::config::LabConfig;
use crate::simulation::lab::{Lab, LabStatus};
use crate::simulation::scheduler::{run_until_cancelled, FixedCadenceHost, FrameHost, LoopExit};
use crate::simulation::states::ContactPhase;
use crate::visualization::surface::RecordingSurface;

/// Display cadence of the headless host
pub const HEADLESS_HZ: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessOptions {
    pub frames: u64,
    pub strike: bool, // strike once on the first frame
    pub realtime: bool, // pace frames against the wall clock
    pub status_every: u64, // log the status every n frames, 0 to disable
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            strike: false,
            realtime: false,
            status_every: 60,
        }
    }
}

/// What a headless run observed
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub ticks: u64,
    pub phases: Vec<ContactPhase>, // contact phase sequence, collapsed
    pub final_status: LabStatus,
    pub last_frame_commands: usize,
}

pub fn run_headless(cfg: &LabConfig, options: HeadlessOptions) -> HeadlessReport {
    let mut lab = Lab::from_config(cfg);
    let mut host = FixedCadenceHost::new(HEADLESS_HZ, options.frames, options.realtime);
    let mut surface = RecordingSurface::new();
    let mut phases = vec![lab.status().phase];

    if options.strike && !lab.strike() {
        log::warn!("strike requested but the {} simulation is not idle in explore mode", lab.active());
    }

    log::info!("headless run: {} frames of the {} simulation", options.frames, lab.active());
    let ticks = drive(&mut lab, &mut host, &mut surface, |lab, ticks| {
        let status = lab.status();
        if phases.last() != Some(&status.phase) {
            phases.push(status.phase);
        }
        if options.status_every > 0 && ticks % options.status_every == 0 {
            log::info!("{status}");
        }
    });
    lab.shutdown();

    let final_status = lab.status();
    log::info!("headless run finished after {ticks} ticks: {final_status}");
    HeadlessReport {
        ticks,
        phases,
        final_status,
        last_frame_commands: surface.commands.len(),
    }
}

/// Drive `lab` with any host until the host closes or the lab stops its
/// loop; returns ticks run
///
/// A loop cancelled by a resize is replaced by a fresh one, which is
/// picked up here. `on_tick` sees the lab after every tick along with the
/// running tick count.
pub fn drive<H, F>(lab: &mut Lab, host: &mut H, surface: &mut RecordingSurface, mut on_tick: F) -> u64
where
    H: FrameHost + ?Sized,
    F: FnMut(&Lab, u64),
{
    let mut ticks = 0;
    while let Some(token) = lab.active_token() {
        let exit = run_until_cancelled(host, &token, |now_ms| {
            if lab.tick(now_ms, &mut *surface) {
                ticks += 1;
                on_tick(&*lab, ticks);
            }
        });
        if exit == LoopExit::HostClosed {
            break;
        }
    }
    ticks
}
