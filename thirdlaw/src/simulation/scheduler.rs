//! Frame scheduling: one cancellable repeat loop per simulation instance
//!
//! The loop itself is host-agnostic. A [`FrameHost`] supplies the display
//! cadence (one timestamp per refresh); [`run_until_cancelled`] repeats a
//! tick closure until the loop's [`CancelToken`] fires or the host stops.
//! The Bevy viewer uses its own `Update` schedule as the host and polls
//! [`FrameScheduler::is_running`] instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared cancellation flag for one loop generation
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owns the loop of one simulation instance
///
/// Starting a new loop always cancels the previous one, so at most one
/// generation is live at any time.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    generation: u64,
    token: Option<CancelToken>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> CancelToken {
        self.cancel();
        self.generation += 1;
        let token = CancelToken::new();
        self.token = Some(token.clone());
        log::debug!("frame loop {} started", self.generation);
        token
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            log::debug!("frame loop {} cancelled", self.generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Token of the live loop, if any
    pub fn token(&self) -> Option<CancelToken> {
        self.token.clone().filter(|t| !t.is_cancelled())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Source of display refreshes
pub trait FrameHost {
    /// Yield until the next refresh and return its timestamp in
    /// milliseconds, or `None` once the host has shut down
    fn next_frame(&mut self) -> Option<f64>;
}

/// Why a loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    HostClosed,
}

/// Repeat `tick` once per host frame until cancelled
///
/// Cancellation is checked both before waiting on the host and before
/// ticking, so a token cancelled inside `tick` never sees another call.
pub fn run_until_cancelled<H, F>(host: &mut H, token: &CancelToken, mut tick: F) -> LoopExit
where
    H: FrameHost + ?Sized,
    F: FnMut(f64),
{
    loop {
        if token.is_cancelled() {
            return LoopExit::Cancelled;
        }
        let Some(now_ms) = host.next_frame() else {
            return LoopExit::HostClosed;
        };
        if token.is_cancelled() {
            return LoopExit::Cancelled;
        }
        tick(now_ms);
    }
}

/// Fixed-cadence host for headless runs
///
/// Produces a bounded number of frames at `interval_ms`. With `realtime`
/// set it sleeps between frames; otherwise time is simulated.
#[derive(Debug, Clone)]
pub struct FixedCadenceHost {
    interval_ms: f64,
    now_ms: f64,
    remaining: u64,
    realtime: bool,
}

impl FixedCadenceHost {
    pub fn new(hz: f64, frames: u64, realtime: bool) -> Self {
        Self {
            interval_ms: 1000.0 / hz.max(1.0),
            now_ms: 0.0,
            remaining: frames,
            realtime,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameHost for FixedCadenceHost {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.realtime {
            thread::sleep(Duration::from_secs_f64(self.interval_ms / 1000.0));
        }
        self.now_ms += self.interval_ms;
        Some(self.now_ms)
    }
}
