//! Leader-side operations: pose updates, signals, and recruitment.

use tracing::{info, trace};

use super::{CoordinatorError, HerdCoordinator};
use crate::leader::LeaderCapability;
use crate::math::Vec3;
use crate::state::{FollowerId, LeaderId, RoamPlan};

impl HerdCoordinator<'_> {
    /// Autonomous recruitment: pulls free followers within the leader's
    /// recruitment radius into its herd, at most once per interval.
    pub fn recruit_nearby(
        &mut self,
        leader: LeaderId,
    ) -> Result<Vec<FollowerId>, CoordinatorError> {
        let now = self.now();
        let config = self.config;
        let tuning = &config.leader;
        let owner = self.leader_mut(leader)?;
        if !owner.accepts_recruits(now) || now < owner.next_recruit_at {
            return Ok(Vec::new());
        }
        owner.next_recruit_at = now + tuning.recruitment_interval;
        let center = owner.position;

        let nearby: Vec<FollowerId> = self
            .state
            .followers
            .values()
            .filter(|f| f.leader().is_none() && !f.is_fleeing(now))
            .filter(|f| f.position().distance(center) <= tuning.recruitment_radius)
            .map(|f| f.id)
            .collect();

        let mut recruited = Vec::new();
        for follower in nearby {
            if self.join(follower, leader)?.is_joined() {
                recruited.push(follower);
            }
        }
        if !recruited.is_empty() {
            info!(%leader, count = recruited.len(), "recruited nearby followers");
        }
        Ok(recruited)
    }

    /// Updates a leader's pose from the host or the leader brain.
    pub fn set_leader_pose(
        &mut self,
        leader: LeaderId,
        position: Vec3,
        heading: f32,
        velocity: Vec3,
    ) -> Result<(), CoordinatorError> {
        let owner = self.leader_mut(leader)?;
        owner.position = position;
        owner.heading = heading;
        owner.velocity = velocity;
        Ok(())
    }

    /// Replaces the wander plan of an autonomous leader.
    ///
    /// Returns false for a player leader, which has no plan.
    pub fn set_roam_plan(
        &mut self,
        leader: LeaderId,
        plan: RoamPlan,
    ) -> Result<bool, CoordinatorError> {
        match self.leader_mut(leader)?.roam_plan_mut() {
            Some(roam) => {
                *roam = plan;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Records a mimicable action (a jump) for followers to copy.
    ///
    /// Returns false while the leader is incapacitated.
    pub fn signal(&mut self, leader: LeaderId) -> Result<bool, CoordinatorError> {
        let now = self.now();
        let owner = self.leader_mut(leader)?;
        if owner.is_incapacitated(now) {
            return Ok(false);
        }
        owner.last_signal_time = Some(now);
        trace!(%leader, now, "leader signal");
        Ok(true)
    }
}
