//! Transient on-screen notices

use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::GameEvent;
use crate::util::time::format_lap_time;

/// How long a notice stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(1800);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub text: String,
    #[serde(skip)]
    pub created_at: Instant,
}

impl Notification {
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTIFICATION_TTL
    }

    /// Notice for a game event, if the event deserves one
    pub fn for_event(event: &GameEvent, now: Instant) -> Option<Self> {
        let text = match event {
            GameEvent::LapCompleted {
                lap,
                duration_ms,
                is_best,
                ..
            } => {
                let time = format_lap_time(Duration::from_millis(*duration_ms));
                if *is_best {
                    format!("Lap {}  {}  New best!", lap, time)
                } else {
                    format!("Lap {}  {}", lap, time)
                }
            }
            GameEvent::CoinCollected { .. } => "+1 coin".to_string(),
            _ => return None,
        };
        Some(Self::new(text, now))
    }
}

/// Notices currently on screen; expiry is wall-clock based, not tick based
#[derive(Debug, Default)]
pub struct Notifications {
    active: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice, dropping any that expired before it was created
    pub fn push(&mut self, notification: Notification) {
        self.prune(notification.created_at);
        self.active.push_back(notification);
    }

    /// Drop notices whose lifetime has passed
    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|n| !n.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop expired notices and return the ones still showing
    pub fn visible(&mut self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.prune(now);
        self.active.iter()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
