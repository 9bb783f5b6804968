//! Vector math for the simulation plane.
//!
//! The world is Y-up. Headings are yaw angles in **degrees**, measured from
//! `+Z` toward `+X`; increasing yaw turns clockwise when seen from above.
//! Every angular helper in this module follows that convention so formation
//! slots, quick-turn arcs, and facing all agree.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

/// The factor to convert degrees to radians.
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
/// The factor to convert radians to degrees.
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// A 3-dimensional vector with `f32` components.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// World up.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// Yaw 0.
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    /// Yaw 90.
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit-length copy, or `Vec3::ZERO` if the length is near zero.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON * EPSILON {
            *self * (1.0 / len_sq.sqrt())
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn dot(&self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(&self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Drops the vertical component.
    #[inline]
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    #[inline]
    pub fn with_y(&self, y: f32) -> Self {
        Self::new(self.x, y, self.z)
    }

    #[inline]
    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    /// Distance ignoring height differences.
    #[inline]
    pub fn horizontal_distance(&self, other: Self) -> f32 {
        (*self - other).horizontal().length()
    }

    /// Linear interpolation with `t` clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t.clamp(0.0, 1.0)
    }

    /// Yaw of the horizontal part of this vector, in degrees.
    ///
    /// A zero vector yields `0.0`.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.x.atan2(self.z) * RAD_TO_DEG
    }

    /// Rotates the vector about the world up axis by `degrees`.
    ///
    /// Rotating [`Vec3::FORWARD`] by `90.0` yields [`Vec3::RIGHT`].
    #[inline]
    pub fn rotate_y(&self, degrees: f32) -> Self {
        let (sin, cos) = (degrees * DEG_TO_RAD).sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Removes the component along `normal`, leaving the part of the vector
    /// that lies in the plane. `normal` does not need to be unit length.
    #[inline]
    pub fn project_on_plane(&self, normal: Self) -> Self {
        let len_sq = normal.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return *self;
        }
        *self - normal * (self.dot(normal) / len_sq)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        let inv_rhs = 1.0 / rhs;
        self * inv_rhs
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// --- Angle helpers ---

/// Unit horizontal vector pointing along `yaw` degrees.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::FORWARD.rotate_y(yaw)
}

/// Wraps an angle into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed difference `to - from`, in `(-180, 180]`.
#[inline]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let delta = wrap_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Signed horizontal angle from `from` to `to`, in degrees.
///
/// Positive when `to` lies clockwise of `from` seen from above.
#[inline]
pub fn signed_angle_y(from: Vec3, to: Vec3) -> f32 {
    let from = from.horizontal();
    let to = to.horizontal();
    let sin = from.cross(to).y;
    let cos = from.dot(to);
    sin.atan2(cos) * RAD_TO_DEG
}

/// Steps `current` toward `target` by at most `max_delta` degrees along the
/// shorter way round.
#[inline]
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Angular sweep from `from` to `to` travelling in a fixed rotation sense.
///
/// The raw difference is wrapped into `[0, 360)`; that wrapped value is the
/// clockwise sweep. Counter-clockwise travel takes the complementary arc as a
/// negative sweep. Either way `from + sweep` lands on `to`.
#[inline]
pub fn arc_sweep(from: f32, to: f32, clockwise: bool) -> f32 {
    let wrapped = wrap_degrees(to - from);
    if clockwise || wrapped == 0.0 {
        wrapped
    } else {
        wrapped - 360.0
    }
}

/// Hermite smoothstep of `t` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Critically damped spring toward `target`.
///
/// `velocity` is the spring's internal rate of change and must be carried
/// between calls. Never overshoots the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = if dt > 0.0 {
            (output - target) / dt
        } else {
            Vec3::ZERO
        };
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotating_forward_by_ninety_yields_right() {
        let rotated = Vec3::FORWARD.rotate_y(90.0);
        assert_relative_eq!(rotated.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.yaw(), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn signed_angle_matches_rotation_sense() {
        assert_relative_eq!(
            signed_angle_y(Vec3::FORWARD, Vec3::RIGHT),
            90.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            signed_angle_y(Vec3::FORWARD, -Vec3::RIGHT),
            -90.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn arc_sweep_respects_rotation_sense() {
        assert_relative_eq!(arc_sweep(10.0, 100.0, true), 90.0);
        assert_relative_eq!(arc_sweep(10.0, 100.0, false), -270.0);
        assert_relative_eq!(arc_sweep(100.0, 10.0, true), 270.0);
        assert_relative_eq!(arc_sweep(45.0, 45.0, false), 0.0);
    }

    #[test]
    fn move_towards_angle_takes_short_way_round() {
        assert_relative_eq!(move_towards_angle(350.0, 10.0, 5.0), 355.0);
        assert_relative_eq!(move_towards_angle(350.0, 10.0, 90.0), 10.0);
    }

    #[test]
    fn projection_removes_normal_component() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let projected = Vec3::FORWARD.project_on_plane(normal);
        assert_relative_eq!(projected.dot(normal), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let target = Vec3::new(5.0, 0.0, 0.0);
        let mut current = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;
        for _ in 0..120 {
            current = smooth_damp(current, target, &mut velocity, 0.1, 1.0 / 60.0);
            assert!(current.x <= target.x + 1e-4);
        }
        assert_relative_eq!(current.x, 5.0, epsilon = 1e-2);
    }
}
