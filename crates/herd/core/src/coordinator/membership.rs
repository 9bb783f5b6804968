//! Roster membership: spawning, joining, leaving, and forced detachment.

use tracing::{debug, info, trace};

use super::{BroadcastReport, CoordinatorError, HerdCoordinator, JoinOutcome};
use crate::env::Effect;
use crate::follower::Follower;
use crate::formation::FormationSolver;
use crate::leader::{Leader, LeaderCapability, LeaderKind};
use crate::math::{Vec3, yaw_forward};
use crate::state::{FollowerId, LeaderId};

impl HerdCoordinator<'_> {
    pub fn add_leader(
        &mut self,
        kind: LeaderKind,
        position: Vec3,
        heading: f32,
    ) -> Result<LeaderId, CoordinatorError> {
        let id = self.state.allocate_leader_id()?;
        let leader = Leader::new(id, kind, position, heading);
        debug!(leader = %id, player = leader.is_player_controlled(), "leader added");
        self.state.leaders.insert(id, leader);
        Ok(id)
    }

    pub fn add_follower(
        &mut self,
        position: Vec3,
        heading: f32,
    ) -> Result<FollowerId, CoordinatorError> {
        let id = self.state.allocate_follower_id()?;
        self.state
            .followers
            .insert(id, Follower::new(id, position, heading));
        trace!(follower = %id, ?position, "follower added");
        Ok(id)
    }

    /// Removes a leader and releases every member back to roaming.
    ///
    /// Returns the released followers, oldest member first.
    pub fn remove_leader(&mut self, id: LeaderId) -> Result<Vec<FollowerId>, CoordinatorError> {
        let now = self.now();
        let config = self.config;
        let mut leader = self
            .state
            .leaders
            .remove(&id)
            .ok_or(CoordinatorError::UnknownLeader(id))?;

        let released = leader.roster_mut().clear();
        for follower_id in &released {
            if let Some(follower) = self.state.followers.get_mut(follower_id) {
                follower.detach(now, None, &config.follower, &config.maneuvers);
            }
        }
        info!(leader = %id, released = released.len(), "leader removed");
        Ok(released)
    }

    /// Removes a follower from the world, cleaning its leader's roster.
    pub fn remove_follower(&mut self, id: FollowerId) -> Result<Follower, CoordinatorError> {
        let follower = self
            .state
            .followers
            .remove(&id)
            .ok_or(CoordinatorError::UnknownFollower(id))?;

        if let Some(leader_id) = follower.leader() {
            if let Some(leader) = self.state.leaders.get_mut(&leader_id) {
                leader.unregister_follower(id);
            }
            self.resync_shield(leader_id);
        }
        debug!(follower = %id, "follower removed");
        Ok(follower)
    }

    /// Attaches `follower` to `leader`.
    ///
    /// A follower that already has a leader is left untouched.
    pub fn join(
        &mut self,
        follower: FollowerId,
        leader: LeaderId,
    ) -> Result<JoinOutcome, CoordinatorError> {
        let now = self.now();
        let current = self
            .state
            .followers
            .get(&follower)
            .ok_or(CoordinatorError::UnknownFollower(follower))?
            .leader();
        let target = self.leader_mut(leader)?;

        if let Some(existing) = current {
            trace!(%follower, %existing, "join ignored: already led");
            return Ok(JoinOutcome::AlreadyLed(existing));
        }
        if !target.accepts_recruits(now) {
            trace!(%follower, %leader, "join ignored: leader unavailable");
            return Ok(JoinOutcome::LeaderUnavailable);
        }

        let order = target.register_follower(follower)?;
        if let Some(agent) = self.state.followers.get_mut(&follower) {
            agent.attach(leader, order, now);
        }
        self.env.emit(Effect::Joined {
            follower,
            leader,
            join_order: order,
        });
        debug!(%follower, %leader, %order, "follower joined");

        self.resync_shield(leader);
        Ok(JoinOutcome::Joined(order))
    }

    /// Detaches `follower` from its leader. Returns false if it had none.
    pub fn leave(&mut self, follower: FollowerId) -> Result<bool, CoordinatorError> {
        let now = self.now();
        let config = self.config;
        let agent = self
            .state
            .followers
            .get_mut(&follower)
            .ok_or(CoordinatorError::UnknownFollower(follower))?;

        let Some(leader_id) = agent.leader() else {
            return Ok(false);
        };
        agent.detach(now, None, &config.follower, &config.maneuvers);
        if let Some(leader) = self.state.leaders.get_mut(&leader_id) {
            leader.unregister_follower(follower);
        }
        debug!(%follower, leader = %leader_id, "follower left");

        self.resync_shield(leader_id);
        Ok(true)
    }

    /// Drops up to `count` of the most recent members of `leader`.
    ///
    /// Each dropped follower flees away from `pivot` before roaming again.
    /// The result lists the dropped followers newest first.
    pub fn detach_most_recent(
        &mut self,
        leader: LeaderId,
        count: usize,
        pivot: Vec3,
    ) -> Result<Vec<FollowerId>, CoordinatorError> {
        let now = self.now();
        let config = self.config;
        let dropped = self.leader_mut(leader)?.roster_mut().pop_most_recent(count);

        for id in &dropped {
            if let Some(follower) = self.state.followers.get_mut(id) {
                let mut away = (follower.position() - pivot).horizontal().normalize();
                if away == Vec3::ZERO {
                    away = -yaw_forward(follower.body.heading);
                }
                follower.detach(now, Some(away), &config.follower, &config.maneuvers);
            }
        }
        debug!(%leader, requested = count, dropped = dropped.len(), "detached most recent");

        self.resync_shield(leader);
        Ok(dropped)
    }

    /// Re-solves a held shield after its membership changed.
    ///
    /// The reference forward captured at shield start is kept.
    pub(crate) fn resync_shield(&mut self, leader: LeaderId) -> BroadcastReport {
        let Some(owner) = self.state.leaders.get(&leader) else {
            return BroadcastReport::default();
        };
        if owner.shield.is_none() {
            return BroadcastReport::default();
        }

        let members: Vec<(FollowerId, Vec3)> = owner
            .roster()
            .members()
            .filter_map(|id| self.state.followers.get(&id).map(|f| (id, f.position())))
            .collect();

        let solver = FormationSolver::new(self.config.maneuvers.shield_radius);
        let Some(hold) = self
            .state
            .leaders
            .get_mut(&leader)
            .and_then(|owner| owner.shield.as_mut())
        else {
            return BroadcastReport::default();
        };
        hold.order = FormationSolver::order_members(hold.pivot, hold.reference_forward, &members);
        let pivot = hold.pivot;
        let slots = solver.assign(pivot, hold.reference_forward, &hold.order);

        trace!(%leader, members = slots.len(), "shield re-solved");
        self.apply_shield_slots(pivot, &slots)
    }
}
