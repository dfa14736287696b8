//! HUD display strings

mod notify;

pub use notify::{Notification, Notifications, NOTIFICATION_TTL};

use serde::Serialize;
use std::time::Duration;

use crate::game::Snapshot;
use crate::util::time::{format_lap_time, format_optional_lap_time};

/// Formatted HUD fields, ready to drop into text elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub lap: String,
    pub lap_time: String,
    pub last_lap: String,
    pub best_lap: String,
    pub speed: String,
    pub boost: String,
    pub coins: String,
}

impl HudView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let lap = &snapshot.lap;
        let vehicle = &snapshot.vehicle;

        let boost_pct = if vehicle.max_boost > 0.0 {
            (vehicle.boost_remaining / vehicle.max_boost * 100.0).round()
        } else {
            0.0
        };

        Self {
            lap: format!("Lap {}", lap.current_lap + 1),
            lap_time: format_lap_time(Duration::from_millis(lap.elapsed_ms)),
            last_lap: format_optional_lap_time(lap.last_lap_ms.map(Duration::from_millis)),
            best_lap: format_optional_lap_time(lap.best_lap_ms.map(Duration::from_millis)),
            speed: format!("{:.0}", vehicle.speed.abs()),
            boost: format!("{:.0}%", boost_pct),
            coins: format!("{}/{}", snapshot.coins_collected, snapshot.coins.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::ChaseCamera;
    use crate::game::snapshot::{LapSnapshot, PropSnapshot, VehicleSnapshot};
    use glam::Vec3;

    fn snapshot() -> Snapshot {
        Snapshot {
            tick: 10,
            vehicle: VehicleSnapshot {
                position: Vec3::ZERO,
                heading: 0.0,
                speed: -7.6,
                boost_remaining: 42.4,
                max_boost: 100.0,
                on_asphalt: true,
            },
            lap: LapSnapshot {
                current_lap: 2,
                next_checkpoint: 1,
                elapsed_ms: 12_345,
                last_lap_ms: Some(41_120),
                best_lap_ms: None,
            },
            coins: vec![true, false, true],
            coins_collected: 2,
            prop: PropSnapshot {
                position: Vec3::ZERO,
                rotation_x: 0.0,
                y_offset: 0.0,
            },
            camera: ChaseCamera::behind(Vec3::ZERO, 0.0),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_hud_strings() {
        let hud = HudView::from_snapshot(&snapshot());
        assert_eq!(hud.lap, "Lap 3");
        assert_eq!(hud.lap_time, "0:12.345");
        assert_eq!(hud.last_lap, "0:41.120");
        assert_eq!(hud.best_lap, "--:--.---");
        assert_eq!(hud.speed, "8");
        assert_eq!(hud.boost, "42%");
        assert_eq!(hud.coins, "2/3");
    }
}
