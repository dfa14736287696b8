//! Oval track geometry
//!
//! The track is three concentric axis-aligned ellipses centred on the origin
//! of the ground (x, z) plane: the outer wall, the inner edge of the asphalt
//! band, and the edge of the infield hole (asphalt edge minus the apron).
//! Driving direction is increasing parametric angle.

mod checkpoint;

pub use checkpoint::{Checkpoint, CHECKPOINT_COUNT};

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Immutable track dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSpec {
    /// Outer wall radius along x (long axis)
    pub outer_x: f32,
    /// Outer wall radius along z (short axis)
    pub outer_z: f32,
    /// Width of the asphalt band
    pub width: f32,
    /// Width of the low-grip apron inside the asphalt band
    pub apron: f32,
}

impl TrackSpec {
    /// Check construction preconditions
    pub fn validate(&self) -> Result<(), TrackError> {
        let values = [self.outer_x, self.outer_z, self.width, self.apron];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TrackError::NonFinite);
        }
        if self.outer_x <= 0.0 || self.outer_z <= 0.0 {
            return Err(TrackError::NonPositiveRadius);
        }
        if self.width <= 0.0 {
            return Err(TrackError::NonPositiveWidth);
        }
        if self.apron < 0.0 {
            return Err(TrackError::NegativeApron);
        }
        // Infield containment ellipse sits one unit inside the apron edge
        let shortest = self.outer_x.min(self.outer_z);
        if self.width + self.apron + 1.0 >= shortest {
            return Err(TrackError::NoInfield {
                band: self.width + self.apron,
                radius: shortest,
            });
        }
        Ok(())
    }
}

/// Track construction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("Track dimensions must be finite")]
    NonFinite,

    #[error("Outer radii must be positive")]
    NonPositiveRadius,

    #[error("Asphalt width must be positive")]
    NonPositiveWidth,

    #[error("Apron width must not be negative")]
    NegativeApron,

    #[error("Asphalt and apron ({band}) leave no infield inside radius {radius}")]
    NoInfield { band: f32, radius: f32 },
}

/// Axis-normalized quadratic form of an ellipse: `<= 1` means inside or on it
#[inline]
pub fn ellipse_norm(x: f32, z: f32, rx: f32, rz: f32) -> f32 {
    let nx = x / rx;
    let nz = z / rz;
    nx * nx + nz * nz
}

/// Point on an origin-centred ellipse at parametric angle `angle`
#[inline]
pub fn ellipse_point(rx: f32, rz: f32, angle: f32) -> Vec2 {
    Vec2::new(rx * angle.cos(), rz * angle.sin())
}

/// Validated track with derived geometry
#[derive(Debug, Clone)]
pub struct Track {
    spec: TrackSpec,
    ride_height: f32,
    checkpoints: Vec<Checkpoint>,
}

impl Track {
    /// Build a track, failing fast on malformed dimensions
    pub fn new(spec: TrackSpec, ride_height: f32) -> Result<Self, TrackError> {
        spec.validate()?;

        let mut track = Self {
            spec,
            ride_height,
            checkpoints: Vec::with_capacity(CHECKPOINT_COUNT),
        };
        track.checkpoints = checkpoint::generate(&track);
        Ok(track)
    }

    pub fn spec(&self) -> &TrackSpec {
        &self.spec
    }

    pub fn ride_height(&self) -> f32 {
        self.ride_height
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Outer wall radii
    pub fn outer_radii(&self) -> (f32, f32) {
        (self.spec.outer_x, self.spec.outer_z)
    }

    /// Inner edge of the asphalt band
    pub fn asphalt_inner_radii(&self) -> (f32, f32) {
        (
            self.spec.outer_x - self.spec.width,
            self.spec.outer_z - self.spec.width,
        )
    }

    /// Edge of the infield hole (asphalt inner edge minus the apron)
    pub fn infield_radii(&self) -> (f32, f32) {
        let (ix, iz) = self.asphalt_inner_radii();
        (ix - self.spec.apron, iz - self.spec.apron)
    }

    /// Radii of the driving line through the middle of the asphalt band
    pub fn centerline_radii(&self) -> (f32, f32) {
        let half = self.spec.width / 2.0;
        (self.spec.outer_x - half, self.spec.outer_z - half)
    }

    /// Parametric angle of a lap progress value, wrapped into `[0, 1)`
    fn progress_angle(progress: f32) -> f32 {
        progress.rem_euclid(1.0) * TAU
    }

    /// Position on the centerline at `progress` (fraction of a lap)
    pub fn point_on_centerline(&self, progress: f32) -> Vec3 {
        let (rx, rz) = self.centerline_radii();
        let p = ellipse_point(rx, rz, Self::progress_angle(progress));
        Vec3::new(p.x, self.ride_height, p.y)
    }

    /// Unit tangent of the centerline in driving direction
    pub fn tangent_at(&self, progress: f32) -> Vec2 {
        let (rx, rz) = self.centerline_radii();
        tangent_at_angle(rx, rz, Self::progress_angle(progress))
    }

    /// Heading whose forward vector follows the centerline at `progress`
    pub fn heading_at(&self, progress: f32) -> f32 {
        let t = self.tangent_at(progress);
        t.x.atan2(t.y)
    }

    /// True when (x, z) is on the drivable asphalt ring.
    /// Ellipse boundaries count as inside, so the outer edge is asphalt and
    /// the inner asphalt edge is not.
    pub fn is_on_asphalt(&self, x: f32, z: f32) -> bool {
        let (ox, oz) = self.outer_radii();
        let (ix, iz) = self.asphalt_inner_radii();
        ellipse_norm(x, z, ox, oz) <= 1.0 && ellipse_norm(x, z, ix, iz) > 1.0
    }
}

/// Driving-direction unit tangent of an ellipse at parametric angle `angle`
pub(crate) fn tangent_at_angle(rx: f32, rz: f32, angle: f32) -> Vec2 {
    Vec2::new(-rx * angle.sin(), rz * angle.cos()).normalize()
}
