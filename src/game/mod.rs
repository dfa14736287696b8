//! Game simulation modules

pub mod camera;
pub mod coins;
pub mod containment;
pub mod context;
pub mod laps;
pub mod physics;
pub mod props;
pub mod snapshot;

pub use context::{GameEvent, SimulationContext};
pub use physics::{PhysicsSystem, VehicleState, VehicleTuning};
pub use snapshot::Snapshot;

use serde::{Deserialize, Serialize};

/// Held driving controls, overwritten by key edges and read once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub throttle_forward: bool,
    pub throttle_reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub boost: bool,
}

impl InputState {
    /// Net steering: +1 right, -1 left, 0 for both or neither
    pub fn steer_sign(&self) -> f32 {
        match (self.steer_left, self.steer_right) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
