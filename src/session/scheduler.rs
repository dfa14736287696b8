//! Tick scheduling independent of any host loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::util::time::clamp_dt;

/// Cancellation flag shared between the scheduler and whoever drives it
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

#[derive(Debug)]
struct Running {
    token: CancelToken,
    last_tick: Option<Instant>,
}

/// Decides whether a tick runs and with which dt
#[derive(Debug, Default)]
pub struct Scheduler {
    running: Option<Running>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin ticking. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.running = Some(Running {
            token: CancelToken::new(),
            last_tick: None,
        });
        true
    }

    /// Halt ticking and cancel the token. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(running) => {
                running.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.token.is_cancelled())
    }

    /// Token for the current run, if any
    pub fn token(&self) -> Option<CancelToken> {
        self.running.as_ref().map(|r| r.token.clone())
    }

    /// Claim the next tick. Returns the clamped dt since the previous tick
    /// (zero for the first tick of a run), or `None` when not running.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let running = self.running.as_mut()?;
        if running.token.is_cancelled() {
            self.running = None;
            return None;
        }

        let dt = running
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        running.last_tick = Some(now);
        Some(clamp_dt(dt))
    }
}
