//! Simulation context and the per-tick pipeline

use glam::Vec2;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::camera::ChaseCamera;
use super::coins::CoinTracker;
use super::containment::{Containment, ContainmentBands};
use super::laps::{LapProgress, LapState, LapTracker};
use super::physics::{PhysicsSystem, VehicleState, VehicleTuning};
use super::props::Prop;
use super::InputState;
use crate::track::Track;
use crate::util::time::clamp_dt;

/// Where the roadside sign stands on the centerline
pub const PROP_PROGRESS: f32 = 0.125;

/// Things that happened during a tick, for HUD and audio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    CheckpointPassed {
        index: usize,
    },
    LapCompleted {
        lap: u32,
        duration_ms: u64,
        best_ms: u64,
        is_best: bool,
    },
    CoinCollected {
        index: usize,
        collected: usize,
        total: usize,
    },
    WallHit {
        speed: f32,
    },
    InfieldCut {
        speed: f32,
    },
    PropToppled,
}

/// Construction parameters for a context
#[derive(Debug, Clone, Copy)]
pub struct ContextOptions {
    pub tuning: VehicleTuning,
    pub coin_count: usize,
    /// Centerline progress the vehicle spawns at, facing along the track
    pub spawn_progress: f32,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            tuning: VehicleTuning::default(),
            coin_count: 12,
            spawn_progress: 0.75,
        }
    }
}

/// All mutable simulation state, owned by the session and passed to ticks
pub struct SimulationContext {
    track: Track,
    bands: ContainmentBands,
    options: ContextOptions,
    pub tick: u64,
    pub vehicle: VehicleState,
    pub laps: LapState,
    pub coins: CoinTracker,
    pub prop: Prop,
    pub camera: ChaseCamera,
    pub on_asphalt: bool,
}

impl SimulationContext {
    pub fn new(track: Track, options: ContextOptions, now: Instant) -> Self {
        let bands = ContainmentBands::for_track(&track);
        let vehicle = spawn_vehicle(&track, &options);
        let coins = CoinTracker::new(&track, options.coin_count);
        let prop = Prop::new(track.point_on_centerline(PROP_PROGRESS));
        let camera = ChaseCamera::behind(vehicle.position, vehicle.heading);
        let on_asphalt = track.is_on_asphalt(vehicle.position.x, vehicle.position.z);

        Self {
            track,
            bands,
            options,
            tick: 0,
            vehicle,
            laps: LapState::new(now),
            coins,
            prop,
            camera,
            on_asphalt,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.options.tuning
    }

    /// Put every piece of session state back to its starting value
    pub fn reset(&mut self, now: Instant) {
        self.tick = 0;
        self.vehicle = spawn_vehicle(&self.track, &self.options);
        self.laps = LapState::new(now);
        self.coins = CoinTracker::new(&self.track, self.options.coin_count);
        self.prop = Prop::new(self.track.point_on_centerline(PROP_PROGRESS));
        self.camera = ChaseCamera::behind(self.vehicle.position, self.vehicle.heading);
        self.on_asphalt = self
            .track
            .is_on_asphalt(self.vehicle.position.x, self.vehicle.position.z);
    }

    /// Run one simulation tick
    pub fn tick(&mut self, input: &InputState, dt: f32, now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let dt = clamp_dt(dt);
        self.tick += 1;

        // Physics
        self.on_asphalt = self
            .track
            .is_on_asphalt(self.vehicle.position.x, self.vehicle.position.z);
        PhysicsSystem::step(
            &mut self.vehicle,
            input,
            dt,
            self.on_asphalt,
            &self.options.tuning,
        );

        // Containment
        match self.bands.apply(&mut self.vehicle) {
            Containment::Clear => {}
            Containment::Wall => events.push(GameEvent::WallHit {
                speed: self.vehicle.speed,
            }),
            Containment::Infield => events.push(GameEvent::InfieldCut {
                speed: self.vehicle.speed,
            }),
        }

        // Laps
        let position = Vec2::new(self.vehicle.position.x, self.vehicle.position.z);
        match LapTracker::update(&mut self.laps, self.track.checkpoints(), position, now) {
            LapProgress::None => {}
            LapProgress::Checkpoint { index } => {
                debug!(checkpoint = index, "Checkpoint passed");
                events.push(GameEvent::CheckpointPassed { index });
            }
            LapProgress::LapCompleted {
                index,
                lap,
                duration,
                is_best,
            } => {
                let best = self.laps.best_lap.unwrap_or(duration);
                info!(
                    lap,
                    duration_ms = millis(duration),
                    best_ms = millis(best),
                    is_best,
                    "Lap completed"
                );
                events.push(GameEvent::CheckpointPassed { index });
                events.push(GameEvent::LapCompleted {
                    lap,
                    duration_ms: millis(duration),
                    best_ms: millis(best),
                    is_best,
                });
            }
        }

        // Coins
        for pickup in self.coins.update(self.vehicle.position) {
            debug!(
                coin = pickup.index,
                collected = pickup.collected,
                total = pickup.total,
                "Coin collected"
            );
            events.push(GameEvent::CoinCollected {
                index: pickup.index,
                collected: pickup.collected,
                total: pickup.total,
            });
        }

        // Presentation-side state
        if self.prop.update(self.vehicle.position, dt) {
            debug!("Sign knocked over");
            events.push(GameEvent::PropToppled);
        }
        self.camera
            .follow(self.vehicle.position, self.vehicle.heading, dt);

        events
    }
}

fn spawn_vehicle(track: &Track, options: &ContextOptions) -> VehicleState {
    let mut position = track.point_on_centerline(options.spawn_progress);
    position.y = options.tuning.ride_height;
    VehicleState::new(
        position,
        track.heading_at(options.spawn_progress),
        options.tuning.max_boost,
    )
}

pub(crate) fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
