//! Roadside sign that tips over when driven into

use glam::Vec3;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// Half extent of the square trigger area around the sign
pub const TRIGGER_HALF_EXTENT: f32 = 1.7;
/// Tipping speed (rad/s)
pub const FALL_RATE: f32 = 2.4;
/// How far the sign sinks once lying flat
pub const FALL_DROP: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prop {
    pub position: Vec3,
    pub toppled: bool,
    pub fall_angle: f32,
}

impl Prop {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            toppled: false,
            fall_angle: 0.0,
        }
    }

    /// Check for a hit and advance the fall animation.
    /// Returns true on the tick the sign gets knocked over.
    pub fn update(&mut self, vehicle: Vec3, dt: f32) -> bool {
        let mut hit = false;
        if !self.toppled {
            let dx = (vehicle.x - self.position.x).abs();
            let dz = (vehicle.z - self.position.z).abs();
            if dx < TRIGGER_HALF_EXTENT && dz < TRIGGER_HALF_EXTENT {
                self.toppled = true;
                hit = true;
            }
        }

        if self.toppled && self.fall_angle < FRAC_PI_2 {
            self.fall_angle = (self.fall_angle + dt * FALL_RATE).min(FRAC_PI_2);
        }
        hit
    }

    /// Rotation about x for the renderer
    pub fn rotation_x(&self) -> f32 {
        -self.fall_angle
    }

    /// Vertical offset for the renderer
    pub fn y_offset(&self) -> f32 {
        -self.fall_angle.sin() * FALL_DROP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topples_once_and_settles() {
        let mut prop = Prop::new(Vec3::new(10.0, 0.0, 5.0));

        assert!(!prop.update(Vec3::new(12.0, 0.0, 5.0), 0.016));
        assert_eq!(prop.fall_angle, 0.0);

        assert!(prop.update(Vec3::new(11.0, 0.0, 4.0), 0.016));
        assert!(prop.fall_angle > 0.0);

        // Further contact is not a new hit
        for _ in 0..100 {
            assert!(!prop.update(Vec3::new(10.0, 0.0, 5.0), 0.03));
        }
        assert_eq!(prop.fall_angle, FRAC_PI_2);
        assert_eq!(prop.rotation_x(), -FRAC_PI_2);
        assert!((prop.y_offset() + FALL_DROP).abs() < 1e-6);
    }
}
