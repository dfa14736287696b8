//! Read-only snapshots handed to the renderer and HUD

use glam::Vec3;
use serde::Serialize;
use std::time::Instant;

use super::camera::ChaseCamera;
use super::context::{millis, GameEvent, SimulationContext};

/// Vehicle transform and gauges
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub position: Vec3,
    pub heading: f32,
    pub speed: f32,
    pub boost_remaining: f32,
    pub max_boost: f32,
    pub on_asphalt: bool,
}

/// Lap timing view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapSnapshot {
    pub current_lap: u32,
    pub next_checkpoint: usize,
    pub elapsed_ms: u64,
    pub last_lap_ms: Option<u64>,
    pub best_lap_ms: Option<u64>,
}

/// Sign transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropSnapshot {
    pub position: Vec3,
    pub rotation_x: f32,
    pub y_offset: f32,
}

/// Everything the presentation layer needs after one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub vehicle: VehicleSnapshot,
    pub lap: LapSnapshot,
    /// Collected flag per coin, in placement order
    pub coins: Vec<bool>,
    pub coins_collected: usize,
    pub prop: PropSnapshot,
    pub camera: ChaseCamera,
    /// Events that occurred since the previous snapshot
    pub events: Vec<GameEvent>,
}

/// Builds snapshots, batching events between sends
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
    /// Events waiting for the next snapshot
    pending_events: Vec<GameEvent>,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
            pending_events: Vec::new(),
        }
    }

    /// Queue events from a tick
    pub fn record(&mut self, events: Vec<GameEvent>) {
        if !events.is_empty() {
            // Lap and coin notices should reach the HUD promptly
            self.force_next();
        }
        self.pending_events.extend(events);
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Drop queued events (session stopped)
    pub fn clear(&mut self) {
        self.ticks_since_snapshot = 0;
        self.pending_events.clear();
    }

    /// Build a snapshot of the context, draining queued events
    pub fn build(&mut self, ctx: &SimulationContext, now: Instant) -> Snapshot {
        let vehicle = &ctx.vehicle;
        let tuning = ctx.tuning();
        let coins: Vec<bool> = ctx.coins.coins().iter().map(|c| c.collected).collect();
        let coins_collected = coins.iter().filter(|c| **c).count();

        Snapshot {
            tick: ctx.tick,
            vehicle: VehicleSnapshot {
                position: vehicle.position,
                heading: vehicle.heading,
                speed: vehicle.speed,
                boost_remaining: vehicle.boost_remaining,
                max_boost: tuning.max_boost,
                on_asphalt: ctx.on_asphalt,
            },
            lap: LapSnapshot {
                current_lap: ctx.laps.current_lap,
                next_checkpoint: ctx.laps.next_checkpoint,
                elapsed_ms: millis(ctx.laps.elapsed(now)),
                last_lap_ms: ctx.laps.last_lap.map(millis),
                best_lap_ms: ctx.laps.best_lap.map(millis),
            },
            coins,
            coins_collected,
            prop: PropSnapshot {
                position: ctx.prop.position,
                rotation_x: ctx.prop.rotation_x(),
                y_offset: ctx.prop.y_offset(),
            },
            camera: ctx.camera,
            events: std::mem::take(&mut self.pending_events),
        }
    }
}
