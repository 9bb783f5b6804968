//! Ground queries.
//!
//! Terrain is generated and owned by the host. The simulation only asks for
//! the surface height and normal under a point; a missing answer means the
//! point is off the terrain and callers keep their current height.

use crate::math::Vec3;

/// Surface information under a world point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundSample {
    pub height: f32,
    /// Unit surface normal.
    pub normal: Vec3,
}

impl GroundSample {
    pub const fn flat(height: f32) -> Self {
        Self {
            height,
            normal: Vec3::UP,
        }
    }
}

/// Terrain oracle consumed by follower motion and maneuvers.
pub trait GroundOracle: Send + Sync {
    /// Samples the surface under `point`, ignoring its height.
    fn sample(&self, point: Vec3) -> Option<GroundSample>;

    /// Convenience accessor for the surface height only.
    fn height_at(&self, point: Vec3) -> Option<f32> {
        self.sample(point).map(|sample| sample.height)
    }
}

/// Infinite horizontal plane at a fixed height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub const fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundOracle for FlatGround {
    fn sample(&self, _point: Vec3) -> Option<GroundSample> {
        Some(GroundSample::flat(self.height))
    }
}

/// Infinite tilted plane `y = origin_height + slope_x * x + slope_z * z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneGround {
    pub origin_height: f32,
    pub slope_x: f32,
    pub slope_z: f32,
}

impl PlaneGround {
    pub const fn new(origin_height: f32, slope_x: f32, slope_z: f32) -> Self {
        Self {
            origin_height,
            slope_x,
            slope_z,
        }
    }
}

impl GroundOracle for PlaneGround {
    fn sample(&self, point: Vec3) -> Option<GroundSample> {
        let height = self.origin_height + self.slope_x * point.x + self.slope_z * point.z;
        let normal = Vec3::new(-self.slope_x, 1.0, -self.slope_z).normalize();
        Some(GroundSample { height, normal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_normal_is_perpendicular_to_slope() {
        let ground = PlaneGround::new(1.0, 0.5, 0.0);
        let sample = ground.sample(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(sample.height, 2.0);
        let along_slope = Vec3::new(1.0, 0.5, 0.0);
        assert_relative_eq!(sample.normal.dot(along_slope), 0.0, epsilon = 1e-5);
    }
}
