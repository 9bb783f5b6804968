//! Condition nodes for the leader tree.

use behavior_tree::{Behavior, Status};

use crate::providers::leader_ai::LeaderBlackboard;

/// Horizontal distance under which a waypoint counts as reached.
pub const ARRIVAL_RADIUS: f32 = 0.5;

/// The wander plan wants a new waypoint.
pub struct IsRoamDue;

impl Behavior<LeaderBlackboard> for IsRoamDue {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        ctx.roam.is_due(ctx.now).into()
    }
}

/// The leader stands on its current waypoint.
pub struct HasArrived;

impl Behavior<LeaderBlackboard> for HasArrived {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        let distance = ctx.position.horizontal_distance(ctx.current_target());
        (distance <= ARRIVAL_RADIUS).into()
    }
}

/// The recruitment interval has elapsed.
pub struct IsRecruitDue;

impl Behavior<LeaderBlackboard> for IsRecruitDue {
    fn tick(&self, ctx: &mut LeaderBlackboard) -> Status {
        (ctx.now >= ctx.next_recruit_at).into()
    }
}
