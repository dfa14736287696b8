//! Session control surface
//!
//! A session owns the simulation context, the held input, and the presenter.
//! Input edges only touch `InputState`; the next tick consumes it.

mod runner;
mod scheduler;

pub use runner::{SessionCommand, SessionError, SessionHandle, SessionRunner};
pub use scheduler::{CancelToken, Scheduler};

use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::context::ContextOptions;
use crate::game::snapshot::SnapshotBuilder;
use crate::game::{GameEvent, InputState, SimulationContext, Snapshot};
use crate::hud::{Notification, Notifications};
use crate::input::{InputAction, KeyEvent};
use crate::present::{Cue, Presenter};
use crate::track::Track;

/// Records that survive stop/start within the process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTotals {
    pub best_lap: Option<Duration>,
    pub laps_completed: u32,
    pub coins_collected: u32,
    pub sessions: u32,
}

impl SessionTotals {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LapCompleted { duration_ms, .. } => {
                let lap = Duration::from_millis(*duration_ms);
                self.laps_completed += 1;
                if self.best_lap.map_or(true, |best| lap < best) {
                    self.best_lap = Some(lap);
                }
            }
            GameEvent::CoinCollected { .. } => self.coins_collected += 1,
            _ => {}
        }
    }
}

pub struct Session {
    id: Uuid,
    ctx: SimulationContext,
    input: InputState,
    scheduler: Scheduler,
    snapshots: SnapshotBuilder,
    notifications: Notifications,
    presenter: Box<dyn Presenter>,
    /// Set after the first failed cue; later failures stay silent
    audio_muted: bool,
    totals: SessionTotals,
}

impl Session {
    pub fn new(
        track: Track,
        options: ContextOptions,
        presenter: Box<dyn Presenter>,
        now: Instant,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ctx: SimulationContext::new(track, options, now),
            input: InputState::default(),
            scheduler: Scheduler::new(),
            snapshots: SnapshotBuilder::new(1),
            notifications: Notifications::new(),
            presenter,
            audio_muted: false,
            totals: SessionTotals::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn totals(&self) -> &SessionTotals {
        &self.totals
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Reset all session state and begin ticking. No-op while running.
    pub fn start(&mut self, now: Instant) -> bool {
        if !self.scheduler.start() {
            return false;
        }

        self.reset_state(now);
        self.totals.sessions += 1;
        self.presenter.show();

        info!(session_id = %self.id, session = self.totals.sessions, "Session started");
        true
    }

    /// Halt ticking and hide presentation. Totals are kept.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.scheduler.stop() {
            return false;
        }

        self.reset_state(now);
        self.presenter.hide();

        info!(
            session_id = %self.id,
            laps = self.totals.laps_completed,
            coins = self.totals.coins_collected,
            best_ms = self.totals.best_lap.map(|d| d.as_millis() as u64),
            "Session stopped"
        );
        true
    }

    /// Fresh run state; the best lap carries over from earlier runs
    fn reset_state(&mut self, now: Instant) {
        self.input.clear();
        self.ctx.reset(now);
        self.ctx.laps.best_lap = self.totals.best_lap;
        self.snapshots.clear();
        self.notifications.clear();
    }

    /// Apply a key edge; Escape stops a running session
    pub fn handle_key(&mut self, event: &KeyEvent, now: Instant) {
        if !self.is_running() {
            return;
        }
        if self.input.apply(event) == InputAction::Stop {
            self.stop(now);
        }
    }

    /// Run one tick if the scheduler allows it and present the result
    pub fn tick(&mut self, now: Instant) -> Option<Snapshot> {
        let dt = self.scheduler.tick(now)?;
        let events = self.ctx.tick(&self.input, dt, now);
        self.notifications.prune(now);

        for event in &events {
            self.totals.record(event);
            if let Some(notification) = Notification::for_event(event, now) {
                self.presenter.notify(&notification);
                self.notifications.push(notification);
            }
            if let Some(cue) = Cue::for_event(event) {
                if let Err(e) = self.presenter.play_cue(cue) {
                    if !self.audio_muted {
                        debug!(session_id = %self.id, error = %e, "Audio cue failed, continuing without sound");
                        self.audio_muted = true;
                    }
                }
            }
        }
        self.snapshots.record(events);

        if !self.snapshots.should_send() {
            return None;
        }
        let snapshot = self.snapshots.build(&self.ctx, now);
        self.presenter.render(&snapshot);
        Some(snapshot)
    }

    /// Notices still on screen
    pub fn visible_notifications(&mut self, now: Instant) -> Vec<Notification> {
        self.notifications.visible(now).cloned().collect()
    }
}
