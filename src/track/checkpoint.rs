//! Ordered checkpoint gates at the four quadrant angles

use glam::Vec2;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

use super::{ellipse_point, tangent_at_angle, Track};

/// Number of checkpoints on every track
pub const CHECKPOINT_COUNT: usize = 4;

/// A half-plane gate: crossed once the vehicle is ahead of `point` along
/// `forward_normal`.
///
/// The half-plane is unbounded, so the gate also reads as crossed from the
/// far side of the oval. Only the order of gates is enforced, which means a
/// lap driven the wrong way round still counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    pub index: usize,
    /// Gate position in the ground (x, z) plane
    pub point: Vec2,
    /// Unit vector pointing in driving direction
    pub forward_normal: Vec2,
}

impl Checkpoint {
    /// Signed distance of `position` past the gate line
    pub fn signed_distance(&self, position: Vec2) -> f32 {
        (position - self.point).dot(self.forward_normal)
    }

    /// True once `position` is strictly past the gate
    pub fn is_crossed_by(&self, position: Vec2) -> bool {
        self.signed_distance(position) > 0.0
    }
}

/// Place the gates midway between the asphalt inner edge and the outer wall
pub(super) fn generate(track: &Track) -> Vec<Checkpoint> {
    let (ox, oz) = track.outer_radii();
    let (ix, iz) = track.asphalt_inner_radii();
    let (rx, rz) = ((ox + ix) / 2.0, (oz + iz) / 2.0);

    (0..CHECKPOINT_COUNT)
        .map(|index| {
            let angle = index as f32 * FRAC_PI_2;
            Checkpoint {
                index,
                point: ellipse_point(rx, rz, angle),
                forward_normal: tangent_at_angle(rx, rz, angle),
            }
        })
        .collect()
}
