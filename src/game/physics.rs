//! Arcade vehicle physics
//!
//! Heading convention used across the crate: the forward vector of heading
//! `h` is `(sin h, 0, cos h)`, so heading 0 faces +z and steering right
//! (positive steer) increases heading.

use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{PI, TAU};

use super::InputState;
use crate::util::time::clamp_dt;

/// Grip multiplier off the asphalt ring
pub const OFF_ASPHALT_GRIP: f32 = 0.55;
/// Top speed multiplier off the asphalt ring
pub const OFF_ASPHALT_SPEED_FACTOR: f32 = 0.5;
/// Friction multiplier off the asphalt ring
pub const OFF_ASPHALT_FRICTION_FACTOR: f32 = 1.6;

/// Vehicle tuning constants
#[derive(Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Throttle acceleration (units/s²)
    pub accel: f32,
    /// Throttle acceleration while boosting
    pub boost_accel: f32,
    /// Deceleration from the reverse/brake key
    pub brake_force: f32,
    /// Coasting deceleration on asphalt
    pub friction: f32,
    /// Top forward speed on asphalt
    pub base_max_speed: f32,
    /// Reverse speed limit as a fraction of the current top speed
    pub max_reverse_fraction: f32,
    /// Turn rate (rad/s) when stationary
    pub turn_rate_at_rest: f32,
    /// Turn rate (rad/s) at top speed
    pub turn_rate_at_max: f32,
    /// Boost meter capacity
    pub max_boost: f32,
    /// Boost meter drain per second while boosting
    pub boost_drain: f32,
    /// Boost meter refill per second otherwise
    pub boost_regen: f32,
    /// Constant height of the vehicle above the ground plane
    pub ride_height: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            accel: 12.0,
            boost_accel: 22.0,
            brake_force: 14.0,
            friction: 2.0,
            base_max_speed: 20.0,
            max_reverse_fraction: 0.4,
            turn_rate_at_rest: 2.4,
            turn_rate_at_max: 1.2,
            max_boost: 100.0,
            boost_drain: 35.0,
            boost_regen: 12.0,
            ride_height: 0.0,
        }
    }
}

impl VehicleTuning {
    /// Forward speed limit for the surface
    pub fn max_speed(&self, on_asphalt: bool) -> f32 {
        if on_asphalt {
            self.base_max_speed
        } else {
            self.base_max_speed * OFF_ASPHALT_SPEED_FACTOR
        }
    }

    /// Reverse speed limit (positive magnitude) for the surface
    pub fn max_reverse_speed(&self, on_asphalt: bool) -> f32 {
        self.max_speed(on_asphalt) * self.max_reverse_fraction
    }
}

/// Vehicle state owned by the simulation (authoritative)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleState {
    pub position: Vec3,
    /// Radians, wrapped into (-π, π]
    pub heading: f32,
    /// Signed, forward positive
    pub speed: f32,
    pub boost_remaining: f32,
}

impl VehicleState {
    pub fn new(position: Vec3, heading: f32, max_boost: f32) -> Self {
        Self {
            position,
            heading: wrap_angle(heading),
            speed: 0.0,
            boost_remaining: max_boost,
        }
    }

    /// Unit forward vector for the current heading
    pub fn forward(&self) -> Vec3 {
        forward_vector(self.heading)
    }
}

/// Unit forward vector for a heading
#[inline]
pub fn forward_vector(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Physics system for updating the vehicle
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Advance the vehicle by one tick
    pub fn step(
        vehicle: &mut VehicleState,
        input: &InputState,
        dt: f32,
        on_asphalt: bool,
        tuning: &VehicleTuning,
    ) {
        let dt = clamp_dt(dt);

        // Surface modifiers
        let grip = if on_asphalt { 1.0 } else { OFF_ASPHALT_GRIP };
        let max_speed = tuning.max_speed(on_asphalt);
        let max_reverse = tuning.max_reverse_speed(on_asphalt);

        // Longitudinal
        let boosting = input.boost
            && input.throttle_forward
            && vehicle.boost_remaining > 0.0
            && on_asphalt;

        if input.throttle_forward {
            let accel = if boosting { tuning.boost_accel } else { tuning.accel };
            vehicle.speed += accel * dt;
        }
        if input.throttle_reverse {
            vehicle.speed -= tuning.brake_force * dt;
        }
        if !input.throttle_forward && !input.throttle_reverse {
            let surface = if on_asphalt { 1.0 } else { OFF_ASPHALT_FRICTION_FACTOR };
            vehicle.speed = Self::apply_friction(vehicle.speed, tuning.friction * surface * dt);
        }

        vehicle.speed = vehicle.speed.clamp(-max_reverse, max_speed);

        // Boost meter
        if boosting && vehicle.speed > 0.0 {
            vehicle.boost_remaining -= tuning.boost_drain * dt;
        } else {
            vehicle.boost_remaining += tuning.boost_regen * dt;
        }
        vehicle.boost_remaining = vehicle.boost_remaining.clamp(0.0, tuning.max_boost);

        // Steering, sharper at low speed; reversing swaps the turn direction
        let speed_fraction = (vehicle.speed.abs() / max_speed).clamp(0.0, 1.0);
        let turn_rate = tuning.turn_rate_at_rest
            + (tuning.turn_rate_at_max - tuning.turn_rate_at_rest) * speed_fraction;
        let direction = if vehicle.speed < 0.0 { -1.0 } else { 1.0 };
        let steer = input.steer_sign() * direction;
        vehicle.heading = wrap_angle(vehicle.heading + turn_rate * steer * dt * grip);

        // Position
        vehicle.position += vehicle.forward() * vehicle.speed * dt;
        vehicle.position.y = tuning.ride_height;
    }

    /// Decelerate toward zero by `amount`, snapping to zero instead of
    /// flipping sign
    pub fn apply_friction(speed: f32, amount: f32) -> f32 {
        let sign = speed.signum();
        let next = speed - sign * amount;
        if speed == 0.0 || next.signum() != sign {
            0.0
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> VehicleState {
        VehicleState::new(Vec3::ZERO, 0.0, VehicleTuning::default().max_boost)
    }

    fn forward() -> InputState {
        InputState {
            throttle_forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_throttle_accelerates_along_heading() {
        let tuning = VehicleTuning::default();
        let mut v = vehicle();
        let mut last_speed = v.speed;
        let mut last_z = v.position.z;

        for _ in 0..4 {
            PhysicsSystem::step(&mut v, &forward(), 0.016, true, &tuning);
            assert!(v.speed > last_speed);
            assert!(v.position.z > last_z);
            assert!(v.position.x.abs() < 1e-6);
            last_speed = v.speed;
            last_z = v.position.z;
        }
        assert!((v.speed - 4.0 * 0.016 * tuning.accel).abs() < 1e-4);
    }

    #[test]
    fn test_speed_stays_in_bounds() {
        let tuning = VehicleTuning::default();
        let inputs = [
            forward(),
            InputState {
                throttle_forward: true,
                boost: true,
                ..Default::default()
            },
            InputState {
                throttle_reverse: true,
                steer_left: true,
                ..Default::default()
            },
            InputState::default(),
        ];

        for on_asphalt in [true, false] {
            for input in &inputs {
                let mut v = vehicle();
                for _ in 0..600 {
                    PhysicsSystem::step(&mut v, input, 1.0, on_asphalt, &tuning);
                    assert!(v.speed <= tuning.max_speed(on_asphalt));
                    assert!(v.speed >= -tuning.max_reverse_speed(on_asphalt));
                    assert!(v.boost_remaining >= 0.0);
                    assert!(v.boost_remaining <= tuning.max_boost);
                }
            }
        }
    }

    #[test]
    fn test_leaving_asphalt_caps_speed() {
        let tuning = VehicleTuning::default();
        let mut v = vehicle();
        v.speed = tuning.base_max_speed;
        PhysicsSystem::step(&mut v, &forward(), 0.016, false, &tuning);
        assert_eq!(v.speed, tuning.base_max_speed * OFF_ASPHALT_SPEED_FACTOR);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        assert_eq!(PhysicsSystem::apply_friction(0.01, 0.5), 0.0);
        assert_eq!(PhysicsSystem::apply_friction(-0.01, 0.5), 0.0);
        assert_eq!(PhysicsSystem::apply_friction(0.0, 0.5), 0.0);
        assert!((PhysicsSystem::apply_friction(3.0, 0.5) - 2.5).abs() < 1e-6);

        let tuning = VehicleTuning::default();
        let mut v = vehicle();
        v.speed = 0.02;
        PhysicsSystem::step(&mut v, &InputState::default(), 0.03, true, &tuning);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_boost_drains_and_regenerates() {
        let tuning = VehicleTuning::default();
        let boost = InputState {
            throttle_forward: true,
            boost: true,
            ..Default::default()
        };

        let mut v = vehicle();
        PhysicsSystem::step(&mut v, &boost, 0.02, true, &tuning);
        assert!(v.boost_remaining < tuning.max_boost);
        assert!((v.speed - tuning.boost_accel * 0.02).abs() < 1e-5);

        // Drains fully, then boost no longer applies
        for _ in 0..300 {
            PhysicsSystem::step(&mut v, &boost, 0.03, true, &tuning);
        }
        // Empty meter only holds the regen of a single tick
        assert!(v.boost_remaining <= tuning.boost_regen * 0.03 + 1e-4);

        let drained = v.boost_remaining;
        PhysicsSystem::step(&mut v, &forward(), 0.03, true, &tuning);
        assert!(v.boost_remaining > drained);
    }

    #[test]
    fn test_boost_does_not_apply_off_asphalt() {
        let tuning = VehicleTuning::default();
        let boost = InputState {
            throttle_forward: true,
            boost: true,
            ..Default::default()
        };
        let mut v = vehicle();
        v.boost_remaining = 50.0;
        PhysicsSystem::step(&mut v, &boost, 0.02, false, &tuning);
        assert!((v.speed - tuning.accel * 0.02).abs() < 1e-5);
        assert!(v.boost_remaining > 50.0);
    }

    #[test]
    fn test_steering_direction_and_grip() {
        let tuning = VehicleTuning::default();
        let right = InputState {
            throttle_forward: true,
            steer_right: true,
            ..Default::default()
        };

        let mut on = vehicle();
        PhysicsSystem::step(&mut on, &right, 0.02, true, &tuning);
        assert!(on.heading > 0.0);

        let mut off = vehicle();
        PhysicsSystem::step(&mut off, &right, 0.02, false, &tuning);
        assert!(off.heading > 0.0);
        assert!(off.heading < on.heading);

        // Reversing swaps the turn direction
        let mut rev = vehicle();
        rev.speed = -5.0;
        let back_right = InputState {
            throttle_reverse: true,
            steer_right: true,
            ..Default::default()
        };
        PhysicsSystem::step(&mut rev, &back_right, 0.02, true, &tuning);
        assert!(rev.heading < 0.0);
    }

    #[test]
    fn test_turn_rate_drops_with_speed() {
        let tuning = VehicleTuning::default();
        let right = InputState {
            steer_right: true,
            throttle_forward: true,
            ..Default::default()
        };

        let mut slow = vehicle();
        PhysicsSystem::step(&mut slow, &right, 0.02, true, &tuning);

        let mut fast = vehicle();
        fast.speed = tuning.base_max_speed;
        PhysicsSystem::step(&mut fast, &right, 0.02, true, &tuning);

        assert!(slow.heading > fast.heading);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5 - TAU) + 0.5).abs() < 1e-5);
    }
}
