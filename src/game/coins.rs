//! Coin pickups placed around the centerline

use glam::Vec3;
use serde::Serialize;

use crate::track::Track;

/// Planar pickup radius around a coin
pub const PICKUP_RADIUS: f32 = 1.2;

/// Coins hover slightly above the ride height
const COIN_HOVER: f32 = 0.6;

/// A single collectible; `collected` only ever flips false -> true
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Collectible {
    pub position: Vec3,
    pub collected: bool,
}

/// A coin picked up this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub index: usize,
    pub collected: usize,
    pub total: usize,
}

/// Tracks which coins have been collected this session
#[derive(Debug, Clone)]
pub struct CoinTracker {
    coins: Vec<Collectible>,
}

impl CoinTracker {
    /// Place `count` coins evenly around the centerline
    pub fn new(track: &Track, count: usize) -> Self {
        let coins = (0..count)
            .map(|i| {
                let mut position = track.point_on_centerline(i as f32 / count as f32);
                position.y += COIN_HOVER;
                Collectible {
                    position,
                    collected: false,
                }
            })
            .collect();
        Self { coins }
    }

    pub fn coins(&self) -> &[Collectible] {
        &self.coins
    }

    pub fn total(&self) -> usize {
        self.coins.len()
    }

    pub fn collected_count(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    /// Collect every uncollected coin within reach of `position`
    pub fn update(&mut self, position: Vec3) -> Vec<Pickup> {
        let radius_sq = PICKUP_RADIUS * PICKUP_RADIUS;
        let mut picked = Vec::new();

        for (index, coin) in self.coins.iter_mut().enumerate() {
            if coin.collected {
                continue;
            }
            let dx = coin.position.x - position.x;
            let dz = coin.position.z - position.z;
            if dx * dx + dz * dz < radius_sq {
                coin.collected = true;
                picked.push(index);
            }
        }

        if picked.is_empty() {
            return Vec::new();
        }

        let collected = self.collected_count();
        let total = self.total();
        picked
            .into_iter()
            .map(|index| Pickup {
                index,
                collected,
                total,
            })
            .collect()
    }
}
