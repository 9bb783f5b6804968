//! Applies the leader tree to the simulation.

use herd_core::{CoordinatorError, FollowerId, GroundOracle, HerdCoordinator, LeaderId, Vec3};
use tracing::trace;

use super::{LeaderBlackboard, LeaderTree};

/// Outcome of one leader's evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderDecision {
    pub leader: LeaderId,
    /// Waypoint drawn this frame, if any.
    pub new_waypoint: Option<Vec3>,
    pub recruited: Vec<FollowerId>,
}

/// Drives every autonomous leader from one shared tree.
#[derive(Default)]
pub struct LeaderBrain {
    tree: LeaderTree,
}

impl LeaderBrain {
    pub fn new(tree: LeaderTree) -> Self {
        Self { tree }
    }

    /// Evaluates and applies the tree for every autonomous leader, in id order.
    pub fn think_all(
        &self,
        coordinator: &mut HerdCoordinator<'_>,
        ground: &dyn GroundOracle,
        dt: f32,
    ) -> Result<Vec<LeaderDecision>, CoordinatorError> {
        let autonomous: Vec<LeaderId> = coordinator
            .state()
            .leaders
            .values()
            .filter(|leader| leader.roam_plan().is_some())
            .map(|leader| leader.id)
            .collect();

        let mut decisions = Vec::with_capacity(autonomous.len());
        for leader in autonomous {
            if let Some(decision) = self.think(coordinator, leader, ground, dt)? {
                decisions.push(decision);
            }
        }
        Ok(decisions)
    }

    /// Evaluates one leader. Returns `None` for a player leader.
    pub fn think(
        &self,
        coordinator: &mut HerdCoordinator<'_>,
        leader: LeaderId,
        ground: &dyn GroundOracle,
        dt: f32,
    ) -> Result<Option<LeaderDecision>, CoordinatorError> {
        let state = coordinator.state();
        let Some(mut ctx) = LeaderBlackboard::snapshot(
            coordinator.leader(leader)?,
            &coordinator.config().leader,
            state.now(),
            dt,
            state.seed,
            state.clock.frame,
        ) else {
            return Ok(None);
        };

        let status = self.tree.evaluate(&mut ctx);
        let plan = ctx.plan;
        trace!(%leader, ?status, recruit = plan.recruit, "leader tree evaluated");

        let mut position = plan.position;
        if let Some(height) = ground.height_at(position) {
            position.y = height;
        }
        coordinator.set_leader_pose(leader, position, plan.heading, plan.velocity)?;
        if let Some(roam) = plan.roam {
            coordinator.set_roam_plan(leader, roam)?;
        }
        let recruited = if plan.recruit {
            coordinator.recruit_nearby(leader)?
        } else {
            Vec::new()
        };

        Ok(Some(LeaderDecision {
            leader,
            new_waypoint: plan.roam.map(|roam| roam.target),
            recruited,
        }))
    }
}
