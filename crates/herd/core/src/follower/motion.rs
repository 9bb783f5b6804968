//! Per-tick movement: roaming, following, maneuvers, and gravity.

use tracing::trace;

use crate::config::HerdConfig;
use crate::env::{GroundOracle, RngOracle, compute_seed, roll};
use crate::leader::LeaderCapability;
use crate::math::{Vec3, move_towards_angle, smooth_damp};

use super::{Follower, ManeuverKind, Progress};

/// Distance at which a roam waypoint counts as reached.
const ROAM_ARRIVE_DISTANCE: f32 = 0.5;
/// Squared speed above which a follower faces its direction of travel.
const FACE_MOVEMENT_SPEED_SQ: f32 = 0.1;
/// Speed below which a follower near its leader counts as idle.
const IDLE_SPEED: f32 = 0.5;
/// Vertical speed held while standing, so grounded checks stay stable.
const GROUNDED_VERTICAL_SPEED: f32 = -2.0;

/// Everything a follower needs from the world for one tick.
pub struct StepContext<'a> {
    pub now: f32,
    pub dt: f32,
    pub seed: u64,
    pub frame: u64,
    pub config: &'a HerdConfig,
    pub ground: &'a dyn GroundOracle,
    pub rng: &'a dyn RngOracle,
}

impl Follower {
    /// Wanders around the roam anchor, or runs to the flee target.
    pub(crate) fn roam_step(&mut self, ctx: &StepContext<'_>) {
        let tuning = &ctx.config.follower;
        let fleeing = self.is_fleeing(ctx.now);
        if !fleeing {
            self.flee_until = None;
            if self.roam.is_due(ctx.now) {
                self.pick_roam_target(ctx);
            }
        }

        let to_target = (self.roam.target - self.body.position).horizontal();
        if to_target.length() <= ROAM_ARRIVE_DISTANCE {
            return;
        }

        let speed = if fleeing {
            tuning.move_speed
        } else {
            tuning.move_speed * 0.5
        };
        let direction = to_target.normalize();
        self.body.heading = move_towards_angle(
            self.body.heading,
            direction.yaw(),
            tuning.rotation_speed * 0.5 * ctx.dt,
        );
        self.body.position += direction * (speed * ctx.dt);
    }

    fn pick_roam_target(&mut self, ctx: &StepContext<'_>) {
        let tuning = &ctx.config.follower;
        let angle_seed = compute_seed(ctx.seed, ctx.frame, self.id.0, roll::ROAM_ANGLE);
        let distance_seed = compute_seed(ctx.seed, ctx.frame, self.id.0, roll::ROAM_DISTANCE);
        let interval_seed = compute_seed(ctx.seed, ctx.frame, self.id.0, roll::ROAM_INTERVAL);

        let offset = ctx.rng.inside_unit_circle(angle_seed, distance_seed) * tuning.roam_radius;
        self.roam.target = self.roam.anchor + offset;
        self.roam.next_pick_at = ctx.now
            + ctx.rng.range_f32(
                interval_seed,
                tuning.roam_interval_min,
                tuning.roam_interval_max,
            );
        trace!(
            follower = %self.id,
            target = ?self.roam.target,
            next_pick_at = self.roam.next_pick_at,
            "roam waypoint"
        );
    }

    /// Moves toward `leader` with a smoothed velocity and copies its signals.
    pub(crate) fn follow_step<L>(&mut self, leader: &L, ctx: &StepContext<'_>)
    where
        L: LeaderCapability + ?Sized,
    {
        let tuning = &ctx.config.follower;
        let to_leader = (leader.position() - self.body.position).horizontal();
        let distance = to_leader.length();

        let desired = if distance > tuning.stop_distance {
            to_leader.normalize() * tuning.move_speed
        } else {
            Vec3::ZERO
        };

        self.move_velocity = if tuning.movement_smooth_time > 0.0 {
            smooth_damp(
                self.move_velocity,
                desired,
                &mut self.damp_velocity,
                tuning.movement_smooth_time,
                ctx.dt,
            )
        } else {
            desired
        };
        self.body.position += self.move_velocity * ctx.dt;

        if self.move_velocity.length_squared() > FACE_MOVEMENT_SPEED_SQ {
            self.body.heading = move_towards_angle(
                self.body.heading,
                self.move_velocity.yaw(),
                tuning.rotation_speed * ctx.dt,
            );
        }

        // Idle inside the dead zone: slowly turn to look at the leader.
        if distance <= tuning.stop_distance
            && to_leader.length_squared() > FACE_MOVEMENT_SPEED_SQ
            && self.move_velocity.length() < IDLE_SPEED
        {
            self.body.heading = move_towards_angle(
                self.body.heading,
                to_leader.yaw(),
                tuning.rotation_speed * 0.5 * ctx.dt,
            );
        }

        self.mimic_signal(leader, ctx);
    }

    /// Jumps after the leader, staggered by join order.
    fn mimic_signal<L>(&mut self, leader: &L, ctx: &StepContext<'_>)
    where
        L: LeaderCapability + ?Sized,
    {
        let Some(signal_at) = leader.last_signal_time() else {
            return;
        };
        if self
            .last_signal_applied
            .is_some_and(|applied| applied >= signal_at)
        {
            return;
        }

        let tuning = &ctx.config.follower;
        let order = self.join_order().map_or(0, |order| order.get());
        let release_at = signal_at + order as f32 * tuning.signal_delay_step;
        if ctx.now < release_at || !self.body.grounded {
            return;
        }

        self.body.vertical_speed = (2.0 * tuning.gravity * tuning.jump_height).sqrt();
        self.body.grounded = false;
        self.last_signal_applied = Some(ctx.now);
        trace!(follower = %self.id, order, "mimicked leader signal");
    }

    /// Advances the active maneuver. Returns its kind if it just finished.
    pub(crate) fn advance_maneuver(&mut self, ctx: &StepContext<'_>) -> Option<ManeuverKind> {
        let tuning = &ctx.config.maneuvers;
        let maneuver = self.maneuver.as_mut()?;
        match maneuver.step(&mut self.body, ctx.dt, tuning, ctx.ground) {
            Progress::Running => None,
            Progress::Complete => {
                let kind = maneuver.kind();
                self.maneuver = None;
                self.cooldowns.start(kind, ctx.now, tuning);
                self.move_velocity = Vec3::ZERO;
                self.damp_velocity = Vec3::ZERO;
                trace!(follower = %self.id, %kind, "maneuver complete");
                Some(kind)
            }
        }
    }

    /// Vertical motion and ground contact.
    ///
    /// Skipped while a maneuver places the body on the ground itself. Off the
    /// terrain the follower keeps its height.
    pub(crate) fn apply_gravity(&mut self, ctx: &StepContext<'_>) {
        if self
            .maneuver
            .as_ref()
            .is_some_and(|maneuver| maneuver.controls_vertical())
        {
            return;
        }

        let body = &mut self.body;
        if body.grounded && body.vertical_speed < 0.0 {
            body.vertical_speed = GROUNDED_VERTICAL_SPEED;
        }
        body.vertical_speed -= ctx.config.follower.gravity * ctx.dt;
        let next_y = body.position.y + body.vertical_speed * ctx.dt;

        match ctx.ground.height_at(body.position) {
            Some(height) if next_y <= height => {
                body.position.y = height;
                body.grounded = true;
            }
            Some(_) => {
                body.position.y = next_y;
                body.grounded = false;
            }
            None => {
                body.vertical_speed = 0.0;
                body.grounded = true;
            }
        }
    }
}
