//! Action nodes for the leader tree.

use behavior_tree::{Behavior, Status};
use herd_core::env::{RngOracle, roll};
use herd_core::math::{move_towards_angle, yaw_forward};
use herd_core::{RoamPlan, Vec3};

use super::conditions::ARRIVAL_RADIUS;
use crate::providers::leader_ai::LeaderBlackboard;

/// Draws a waypoint inside the wander disc and schedules the next draw.
pub struct PickRoamTarget;

impl Behavior<LeaderBlackboard> for PickRoamTarget {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        let offset = ctx
            .rng()
            .inside_unit_circle(
                ctx.roll_seed(roll::LEADER_ANGLE),
                ctx.roll_seed(roll::LEADER_DISTANCE),
            )
            * ctx.tuning.roam_radius;
        let wait = ctx.rng().range_f32(
            ctx.roll_seed(roll::LEADER_INTERVAL),
            ctx.tuning.roam_interval_min,
            ctx.tuning.roam_interval_max,
        );

        ctx.plan.roam = Some(RoamPlan {
            anchor: ctx.roam.anchor,
            target: ctx.roam.anchor + offset,
            next_pick_at: ctx.now + wait,
        });
        Status::Success
    }
}

/// Turns toward the waypoint and walks at roam speed without overshooting.
pub struct WalkToTarget;

impl Behavior<LeaderBlackboard> for WalkToTarget {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        let to_target = (ctx.current_target() - ctx.position).horizontal();
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return Status::Failure;
        }

        let heading = move_towards_angle(
            ctx.heading,
            to_target.yaw(),
            ctx.tuning.rotation_speed * ctx.dt,
        );
        let step = (ctx.tuning.roam_speed * ctx.dt).min((distance - ARRIVAL_RADIUS).max(0.0));
        let forward = yaw_forward(heading);

        ctx.plan.heading = heading;
        ctx.plan.position = ctx.position + forward * step;
        ctx.plan.velocity = forward * (step / ctx.dt);
        Status::Success
    }
}

/// Stands still, keeping the current pose.
pub struct HoldPosition;

impl Behavior<LeaderBlackboard> for HoldPosition {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        ctx.plan.position = ctx.position;
        ctx.plan.heading = ctx.heading;
        ctx.plan.velocity = Vec3::ZERO;
        Status::Success
    }
}

/// Asks for a recruitment scan this frame.
pub struct RequestRecruit;

impl Behavior<LeaderBlackboard> for RequestRecruit {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        ctx.plan.recruit = true;
        Status::Success
    }
}
