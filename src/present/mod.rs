//! Presentation contract
//!
//! The session receives already-constructed presenters and only ever hands
//! them read-only snapshots. Renderers, HUD overlays and audio live behind
//! this trait.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::game::{GameEvent, Snapshot};
use crate::hud::{HudView, Notification};

/// Sound cues triggered by game events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Checkpoint,
    Lap,
    Coin,
    Wall,
    Prop,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CheckpointPassed { .. } => Some(Self::Checkpoint),
            GameEvent::LapCompleted { .. } => Some(Self::Lap),
            GameEvent::CoinCollected { .. } => Some(Self::Coin),
            GameEvent::WallHit { .. } => Some(Self::Wall),
            GameEvent::PropToppled => Some(Self::Prop),
            GameEvent::InfieldCut { .. } => None,
        }
    }
}

/// Audio errors; the simulation carries on without sound
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio output unavailable")]
    Unavailable,

    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// A presentation handle driven by the session
pub trait Presenter: Send {
    /// Session started; make the game layer visible
    fn show(&mut self);

    /// Session stopped; hide the game layer
    fn hide(&mut self);

    /// Draw the state after a completed tick
    fn render(&mut self, snapshot: &Snapshot);

    /// Display a transient notice
    fn notify(&mut self, notification: &Notification);

    /// Play a sound cue
    fn play_cue(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Headless presenter: HUD lines through tracing, optional JSON snapshots on
/// stdout
pub struct LogPresenter {
    json_snapshots: bool,
    /// Log the HUD every this many rendered snapshots
    hud_every: u64,
    rendered: u64,
}

impl LogPresenter {
    pub fn new(json_snapshots: bool, hud_every: u64) -> Self {
        Self {
            json_snapshots,
            hud_every: hud_every.max(1),
            rendered: 0,
        }
    }
}

impl Presenter for LogPresenter {
    fn show(&mut self) {
        info!("Game layer shown");
        self.rendered = 0;
    }

    fn hide(&mut self) {
        info!("Game layer hidden");
    }

    fn render(&mut self, snapshot: &Snapshot) {
        self.rendered += 1;

        if self.json_snapshots {
            match serde_json::to_string(snapshot) {
                Ok(line) => {
                    let mut stdout = std::io::stdout().lock();
                    if let Err(e) = writeln!(stdout, "{}", line) {
                        warn!(error = %e, "Failed to write snapshot");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to encode snapshot"),
            }
        }

        if self.rendered % self.hud_every == 0 {
            let hud = HudView::from_snapshot(snapshot);
            debug!(
                lap = %hud.lap,
                time = %hud.lap_time,
                best = %hud.best_lap,
                speed = %hud.speed,
                boost = %hud.boost,
                coins = %hud.coins,
                "HUD"
            );
        }
    }

    fn notify(&mut self, notification: &Notification) {
        info!(text = %notification.text, "Notification");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Presenter that records every call
    #[derive(Default)]
    pub struct RecordingPresenter {
        pub visible: bool,
        pub shows: u32,
        pub hides: u32,
        pub snapshots: Vec<Snapshot>,
        pub notices: Vec<String>,
        pub cues: Vec<Cue>,
        pub audio: bool,
    }

    impl Presenter for RecordingPresenter {
        fn show(&mut self) {
            self.visible = true;
            self.shows += 1;
        }

        fn hide(&mut self) {
            self.visible = false;
            self.hides += 1;
        }

        fn render(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.clone());
        }

        fn notify(&mut self, notification: &Notification) {
            self.notices.push(notification.text.clone());
        }

        fn play_cue(&mut self, cue: Cue) -> Result<(), AudioError> {
            if self.audio {
                self.cues.push(cue);
                Ok(())
            } else {
                Err(AudioError::Playback("no device".to_string()))
            }
        }
    }
}
