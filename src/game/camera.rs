//! Chase camera following the vehicle

use glam::Vec3;
use serde::Serialize;

use super::physics::forward_vector;

/// Height of the camera above the vehicle
pub const CAMERA_HEIGHT: f32 = 1.6;
/// Distance behind the vehicle
pub const CAMERA_DISTANCE: f32 = 4.0;
/// Height of the look-at point above the vehicle
pub const LOOK_HEIGHT: f32 = 0.5;
/// Fraction of the remaining gap left after one second of smoothing
const SMOOTHING: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub target: Vec3,
}

impl ChaseCamera {
    /// Camera already settled behind the vehicle
    pub fn behind(vehicle: Vec3, heading: f32) -> Self {
        Self {
            position: desired_position(vehicle, heading),
            target: look_target(vehicle),
        }
    }

    /// Ease toward the spot behind the vehicle; frame-rate independent
    pub fn follow(&mut self, vehicle: Vec3, heading: f32, dt: f32) {
        let t = 1.0 - SMOOTHING.powf(dt);
        self.position = self.position.lerp(desired_position(vehicle, heading), t);
        self.target = look_target(vehicle);
    }
}

/// Spot opposite the forward vector, raised by the camera height
pub fn desired_position(vehicle: Vec3, heading: f32) -> Vec3 {
    vehicle - forward_vector(heading) * CAMERA_DISTANCE + Vec3::Y * CAMERA_HEIGHT
}

fn look_target(vehicle: Vec3) -> Vec3 {
    vehicle + Vec3::Y * LOOK_HEIGHT
}
