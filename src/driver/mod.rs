//! Input sources for the headless host: stdin key events and an autopilot

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::game::physics::wrap_angle;
use crate::game::snapshot::VehicleSnapshot;
use crate::game::InputState;
use crate::input::KeyEvent;
use crate::session::SessionHandle;
use crate::track::Track;

/// How far ahead on the centerline the autopilot aims (fraction of a lap)
const LOOKAHEAD: f32 = 0.03;
/// Heading error ignored by the autopilot (radians)
const STEER_DEADBAND: f32 = 0.02;

/// Pure-pursuit driver following the centerline
#[derive(Debug, Clone)]
pub struct Autopilot {
    track: Track,
    cruise_speed: f32,
}

impl Autopilot {
    pub fn new(track: Track, cruise_speed: f32) -> Self {
        Self {
            track,
            cruise_speed,
        }
    }

    /// Controls to hold for the given vehicle state
    pub fn decide(&self, vehicle: &VehicleSnapshot) -> InputState {
        let pos = vehicle.position;
        let (rx, rz) = self.track.centerline_radii();
        let angle = (pos.z / rz).atan2(pos.x / rx);
        let progress = angle / std::f32::consts::TAU + LOOKAHEAD;

        let target = self.track.point_on_centerline(progress);
        let desired = (target.x - pos.x).atan2(target.z - pos.z);
        let error = wrap_angle(desired - vehicle.heading);

        InputState {
            throttle_forward: vehicle.speed < self.cruise_speed,
            steer_right: error > STEER_DEADBAND,
            steer_left: error < -STEER_DEADBAND,
            ..Default::default()
        }
    }
}

/// Key edges that turn `from` into `to`
pub fn key_edges(from: &InputState, to: &InputState) -> Vec<KeyEvent> {
    let flags = [
        ("w", from.throttle_forward, to.throttle_forward),
        ("s", from.throttle_reverse, to.throttle_reverse),
        ("a", from.steer_left, to.steer_left),
        ("d", from.steer_right, to.steer_right),
        ("Shift", from.boost, to.boost),
    ];

    flags
        .into_iter()
        .filter(|(_, before, after)| before != after)
        .map(|(key, _, pressed)| {
            let key = key.to_string();
            if pressed {
                KeyEvent::KeyDown { key }
            } else {
                KeyEvent::KeyUp { key }
            }
        })
        .collect()
}

/// Drive the session from snapshots until the loop closes
pub async fn run_autopilot(handle: SessionHandle, autopilot: Autopilot) {
    let mut snapshots = handle.subscribe();
    let mut held = InputState::default();
    info!(session_id = %handle.id, "Autopilot engaged");

    loop {
        let snapshot = match snapshots.recv().await {
            Ok(snapshot) => snapshot,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                debug!(skipped = n, "Autopilot lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        // A fresh session starts with nothing held
        if snapshot.tick <= 1 {
            held = InputState::default();
        }

        let wanted = autopilot.decide(&snapshot.vehicle);
        for event in key_edges(&held, &wanted) {
            if handle.key(event).await.is_err() {
                return;
            }
        }
        held = wanted;
    }
}

/// Forward JSON key events from stdin, one per line
pub async fn run_stdin(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<KeyEvent>(line) {
            Ok(event) => {
                if handle.key(event).await.is_err() {
                    debug!("Session closed, stopping stdin reader");
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Failed to parse key event"),
        }
    }
}
