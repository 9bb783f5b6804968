//! Leader-issued group maneuvers as resumable routines.
//!
//! Each routine performs one increment of work per call to `step` and keeps
//! all of its progress in its own fields. A routine is dropped the instant a
//! forced transition happens; there is no cleanup phase to wait for.

use crate::config::ManeuverTuning;
use crate::env::GroundOracle;
use crate::math::{Vec3, arc_sweep, lerp, smoothstep, yaw_forward};

use super::Body;

/// Tolerance that absorbs float drift when summing per-tick distances.
const DISTANCE_TOLERANCE: f32 = 1e-4;

/// Height above the surface beyond which a dashing follower counts as airborne.
const AIRBORNE_CLEARANCE: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManeuverKind {
    Dash,
    QuickTurn,
    Shield,
}

/// Whether a routine wants another tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Running,
    Complete,
}

/// The single active maneuver of a follower.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maneuver {
    Dash(DashRoutine),
    QuickTurn(QuickTurnRoutine),
    Shield(ShieldRoutine),
}

impl Maneuver {
    pub fn kind(&self) -> ManeuverKind {
        match self {
            Self::Dash(_) => ManeuverKind::Dash,
            Self::QuickTurn(_) => ManeuverKind::QuickTurn,
            Self::Shield(_) => ManeuverKind::Shield,
        }
    }

    /// True while the routine positions the body against the ground itself.
    pub fn controls_vertical(&self) -> bool {
        match self {
            Self::Dash(dash) => matches!(dash.phase, DashPhase::Travel),
            Self::QuickTurn(_) | Self::Shield(_) => true,
        }
    }

    pub(crate) fn step(
        &mut self,
        body: &mut Body,
        dt: f32,
        tuning: &ManeuverTuning,
        ground: &dyn GroundOracle,
    ) -> Progress {
        match self {
            Self::Dash(dash) => dash.step(body, dt, tuning, ground),
            Self::QuickTurn(turn) => turn.step(body, dt, ground),
            Self::Shield(shield) => shield.step(body, dt, tuning, ground),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DashPhase {
    Travel,
    /// Mandatory pause after travel; the cooldown starts when it ends.
    Recover { remaining: f32 },
}

/// Straight burst along a fixed horizontal direction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashRoutine {
    /// Unit horizontal direction.
    pub direction: Vec3,
    pub traveled: f32,
    pub phase: DashPhase,
}

impl DashRoutine {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction,
            traveled: 0.0,
            phase: DashPhase::Travel,
        }
    }

    fn step(
        &mut self,
        body: &mut Body,
        dt: f32,
        tuning: &ManeuverTuning,
        ground: &dyn GroundOracle,
    ) -> Progress {
        match &mut self.phase {
            DashPhase::Travel => {
                let remaining = (tuning.dash_distance - self.traveled).max(0.0);
                let step_len = (tuning.dash_speed * dt).min(remaining);

                // Follow the local slope so the follower hugs the surface.
                let mut direction = self.direction;
                if let Some(sample) = ground.sample(body.position) {
                    let along_surface = self.direction.project_on_plane(sample.normal).normalize();
                    if along_surface != Vec3::ZERO {
                        direction = along_surface;
                    }
                }
                body.position += direction * step_len;
                body.vertical_speed = 0.0;
                body.heading = self.direction.yaw();

                if let Some(height) = ground.height_at(body.position) {
                    if body.position.y > height + AIRBORNE_CLEARANCE {
                        // Pull back down instead of launching off a crest.
                        body.position.y = (body.position.y
                            - tuning.dash_airborne_correction * dt)
                            .max(height);
                        body.grounded = body.position.y <= height;
                    } else {
                        body.position.y = height;
                        body.grounded = true;
                    }
                }

                self.traveled += step_len;
                if self.traveled >= tuning.dash_distance - DISTANCE_TOLERANCE {
                    self.phase = DashPhase::Recover {
                        remaining: tuning.dash_return_delay,
                    };
                }
                Progress::Running
            }
            DashPhase::Recover { remaining } => {
                *remaining -= dt;
                if *remaining <= 1e-6 {
                    Progress::Complete
                } else {
                    Progress::Running
                }
            }
        }
    }
}

/// Eased arc around a pivot toward the far side of the formation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuickTurnRoutine {
    pub pivot: Vec3,
    pub start_angle: f32,
    /// Signed sweep in degrees; positive is clockwise.
    pub sweep: f32,
    pub start_radius: f32,
    pub end_radius: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub clockwise: bool,
}

impl QuickTurnRoutine {
    /// Plans an arc from `from` to `to` around `pivot` in the given rotation sense.
    pub fn new(pivot: Vec3, from: Vec3, to: Vec3, clockwise: bool, duration: f32) -> Self {
        let start_offset = (from - pivot).horizontal();
        let end_offset = (to - pivot).horizontal();
        let start_angle = start_offset.yaw();
        let end_angle = end_offset.yaw();
        Self {
            pivot,
            start_angle,
            sweep: arc_sweep(start_angle, end_angle, clockwise),
            start_radius: start_offset.length(),
            end_radius: end_offset.length(),
            elapsed: 0.0,
            duration,
            clockwise,
        }
    }

    /// Horizontal point on the arc at normalized progress `t`.
    pub fn point_at(&self, t: f32) -> (Vec3, f32) {
        let eased = smoothstep(t);
        let angle = self.start_angle + self.sweep * eased;
        let radius = lerp(self.start_radius, self.end_radius, eased);
        (self.pivot.horizontal() + yaw_forward(angle) * radius, angle)
    }

    fn step(&mut self, body: &mut Body, dt: f32, ground: &dyn GroundOracle) -> Progress {
        self.elapsed += dt;
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        let (point, angle) = self.point_at(t);
        let height = ground.height_at(point).unwrap_or(body.position.y);

        body.position = point.with_y(height);
        body.vertical_speed = 0.0;
        body.grounded = true;
        // Tangent to the arc, pointing along the direction of travel.
        body.heading = if self.clockwise {
            angle + 90.0
        } else {
            angle - 90.0
        };

        if t >= 1.0 {
            Progress::Complete
        } else {
            Progress::Running
        }
    }
}

/// Approach to a ring slot followed by an open-ended hold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldRoutine {
    pub slot: Vec3,
    pub pivot: Vec3,
    pub holding: bool,
}

impl ShieldRoutine {
    pub fn new(slot: Vec3, pivot: Vec3) -> Self {
        Self {
            slot,
            pivot,
            holding: false,
        }
    }

    /// Moves the slot. A follower already holding re-approaches only when
    /// the slot moved noticeably.
    pub fn retarget(&mut self, slot: Vec3, pivot: Vec3, arrive_distance: f32) {
        if self.slot.horizontal_distance(slot) > arrive_distance {
            self.holding = false;
        }
        self.slot = slot;
        self.pivot = pivot;
    }

    fn step(
        &mut self,
        body: &mut Body,
        dt: f32,
        tuning: &ManeuverTuning,
        ground: &dyn GroundOracle,
    ) -> Progress {
        let to_slot = (self.slot - body.position).horizontal();
        let distance = to_slot.length();

        if !self.holding && distance > tuning.shield_arrive_distance {
            let step_len = (tuning.dash_speed * dt).min(distance);
            body.position += to_slot.normalize() * step_len;
            body.heading = to_slot.yaw();
        } else {
            self.holding = true;
            body.position = self.slot.with_y(body.position.y);
            let outward = (body.position - self.pivot).horizontal();
            if outward.length_squared() > 1e-6 {
                body.heading = outward.yaw();
            }
        }

        if let Some(height) = ground.height_at(body.position) {
            body.position.y = height;
        }
        body.vertical_speed = 0.0;
        body.grounded = true;

        Progress::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FlatGround;
    use approx::assert_relative_eq;

    fn body_at(position: Vec3) -> Body {
        Body {
            position,
            heading: 0.0,
            vertical_speed: 0.0,
            grounded: true,
        }
    }

    #[test]
    fn quick_turn_lands_on_target_and_faces_tangent() {
        let ground = FlatGround::new(0.0);
        let pivot = Vec3::ZERO;
        let from = Vec3::new(0.0, 0.0, -3.0);
        let to = Vec3::new(0.0, 0.0, 8.0);
        let mut routine = QuickTurnRoutine::new(pivot, from, to, true, 0.5);
        let mut body = body_at(from);

        let mut ticks = 0;
        while routine.step(&mut body, 0.05, &ground) == Progress::Running {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_relative_eq!(body.position.x, to.x, epsilon = 1e-3);
        assert_relative_eq!(body.position.z, to.z, epsilon = 1e-3);
    }

    #[test]
    fn clockwise_quick_turn_sweeps_positive() {
        let routine = QuickTurnRoutine::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            true,
            0.5,
        );
        assert_relative_eq!(routine.sweep, 90.0, epsilon = 1e-3);

        // Halfway along a clockwise arc from +Z the follower is at +X/+Z.
        let (mid, _) = routine.point_at(0.5);
        assert!(mid.x > 0.0 && mid.z > 0.0);
    }

    #[test]
    fn counter_clockwise_quick_turn_takes_the_long_way() {
        let routine = QuickTurnRoutine::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            false,
            0.5,
        );
        assert_relative_eq!(routine.sweep, -270.0, epsilon = 1e-3);
    }

    #[test]
    fn shield_approaches_then_faces_outward() {
        let ground = FlatGround::new(0.0);
        let tuning = ManeuverTuning::default();
        let pivot = Vec3::ZERO;
        let slot = Vec3::new(3.0, 0.0, 0.0);
        let mut routine = ShieldRoutine::new(slot, pivot);
        let mut body = body_at(Vec3::new(-3.0, 0.0, 0.0));

        for _ in 0..60 {
            assert_eq!(
                routine.step(&mut body, 1.0 / 60.0, &tuning, &ground),
                Progress::Running
            );
        }
        assert!(routine.holding);
        assert_relative_eq!(body.position.x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(body.heading, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn dash_hugs_a_slope() {
        let ground = crate::env::PlaneGround::new(0.0, 0.0, 0.5);
        let tuning = ManeuverTuning::default();
        let mut routine = DashRoutine::new(Vec3::FORWARD);
        let mut body = body_at(Vec3::ZERO);

        for _ in 0..10 {
            routine.step(&mut body, 1.0 / 60.0, &tuning, &ground);
            let surface = ground.height_at(body.position).unwrap();
            assert_relative_eq!(body.position.y, surface, epsilon = 1e-3);
        }
        assert!(body.position.z > 0.0);
    }
}
