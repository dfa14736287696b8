//! Soft boundary containment
//!
//! Positional snaps plus a speed penalty instead of collision response. One
//! correction per tick is enough: the capped tick cannot carry the car across
//! a whole containment band.

use serde::Serialize;

use super::physics::VehicleState;
use crate::track::{ellipse_norm, ellipse_point, Track};

/// Distance beyond the outer wall tolerated before the wall snap kicks in
pub const OUTER_MARGIN: f32 = 1.0;
/// Distance inside the apron edge where the infield limit sits
pub const INFIELD_MARGIN: f32 = 1.0;
/// Extra outward offset applied by the infield snap so the corrected point
/// lies strictly outside the limit ellipse
pub const INFIELD_SNAP_CLEARANCE: f32 = 0.05;
/// Speed multiplier after touching the outer wall
pub const WALL_SPEED_FACTOR: f32 = 0.6;
/// Speed multiplier after cutting into the infield
pub const INFIELD_SPEED_FACTOR: f32 = 0.5;

/// Which correction (if any) was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    Clear,
    Wall,
    Infield,
}

/// Containment limits derived from a track
#[derive(Debug, Clone, Copy)]
pub struct ContainmentBands {
    /// Vehicles beyond this ellipse are snapped back
    pub outer_limit: (f32, f32),
    /// Where wall snaps land
    pub outer_snap: (f32, f32),
    /// Vehicles inside this ellipse are pushed out
    pub infield_limit: (f32, f32),
}

impl ContainmentBands {
    pub fn for_track(track: &Track) -> Self {
        let (ox, oz) = track.outer_radii();
        let (fx, fz) = track.infield_radii();
        Self {
            outer_limit: (ox + OUTER_MARGIN, oz + OUTER_MARGIN),
            outer_snap: (ox - OUTER_MARGIN, oz - OUTER_MARGIN),
            infield_limit: (fx - INFIELD_MARGIN, fz - INFIELD_MARGIN),
        }
    }

    /// Apply at most one correction to the vehicle
    pub fn apply(&self, vehicle: &mut VehicleState) -> Containment {
        let (x, z) = (vehicle.position.x, vehicle.position.z);
        let angle = z.atan2(x);

        let (lx, lz) = self.outer_limit;
        if ellipse_norm(x, z, lx, lz) > 1.0 {
            let (sx, sz) = self.outer_snap;
            let p = ellipse_point(sx, sz, angle);
            vehicle.position.x = p.x;
            vehicle.position.z = p.y;
            vehicle.speed *= WALL_SPEED_FACTOR;
            return Containment::Wall;
        }

        let (ix, iz) = self.infield_limit;
        if ellipse_norm(x, z, ix, iz) < 1.0 {
            let p = ellipse_point(
                ix + INFIELD_SNAP_CLEARANCE,
                iz + INFIELD_SNAP_CLEARANCE,
                angle,
            );
            vehicle.position.x = p.x;
            vehicle.position.z = p.y;
            vehicle.speed *= INFIELD_SPEED_FACTOR;
            return Containment::Infield;
        }

        Containment::Clear
    }
}
