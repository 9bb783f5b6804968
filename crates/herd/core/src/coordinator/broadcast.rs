//! Leader commands fanned out to every roster member.
//!
//! Commands are never pre-filtered: each member is addressed and applies its
//! own cooldown and state gate. An incapacitated leader cannot issue commands.

use tracing::debug;

use super::{BroadcastReport, CoordinatorError, HerdCoordinator};
use crate::formation::{FormationSolver, SlotAssignment};
use crate::leader::ShieldHold;
use crate::math::Vec3;
use crate::state::{FollowerId, LeaderId};

impl HerdCoordinator<'_> {
    /// Members of `leader` in join order, or `None` while it is incapacitated.
    fn commandable_members(
        &self,
        leader: LeaderId,
    ) -> Result<Option<Vec<FollowerId>>, CoordinatorError> {
        let owner = self.leader(leader)?;
        if owner.is_incapacitated(self.now()) {
            debug!(%leader, "command refused: leader incapacitated");
            return Ok(None);
        }
        Ok(Some(owner.roster().members().collect()))
    }

    /// Tells every member to dash along `direction`.
    ///
    /// A direction without horizontal extent falls back to the leader's facing.
    pub fn broadcast_dash(
        &mut self,
        leader: LeaderId,
        direction: Vec3,
    ) -> Result<BroadcastReport, CoordinatorError> {
        let Some(members) = self.commandable_members(leader)? else {
            return Ok(BroadcastReport::default());
        };
        let now = self.now();
        let mut direction = direction.horizontal();
        if direction.length_squared() <= f32::EPSILON {
            direction = self.leader(leader)?.forward();
        }

        let mut report = BroadcastReport::default();
        for id in members {
            if let Some(follower) = self.state.followers.get_mut(&id) {
                report.addressed += 1;
                if follower.try_start_dash(direction, now) {
                    report.accepted += 1;
                }
            }
        }
        debug!(%leader, addressed = report.addressed, accepted = report.accepted, "dash broadcast");
        Ok(report)
    }

    /// Tells every member to swing around `pivot` to the far side.
    ///
    /// Each member mirrors its offset through the pivot and lands
    /// `formation_distance` further along `forward`.
    pub fn broadcast_quick_turn(
        &mut self,
        leader: LeaderId,
        pivot: Vec3,
        forward: Vec3,
        clockwise: bool,
    ) -> Result<BroadcastReport, CoordinatorError> {
        let Some(members) = self.commandable_members(leader)? else {
            return Ok(BroadcastReport::default());
        };
        let now = self.now();
        let tuning = &self.config.maneuvers;
        let forward = FormationSolver::reference_forward(forward);

        let mut report = BroadcastReport::default();
        for id in members {
            if let Some(follower) = self.state.followers.get_mut(&id) {
                report.addressed += 1;
                let offset = follower.position() - pivot;
                let target = pivot + offset.rotate_y(180.0) + forward * tuning.formation_distance;
                if follower.try_start_quick_turn(pivot, target, clockwise, now, tuning) {
                    report.accepted += 1;
                }
            }
        }
        debug!(
            %leader,
            clockwise,
            addressed = report.addressed,
            accepted = report.accepted,
            "quick turn broadcast"
        );
        Ok(report)
    }

    /// Starts a shield ring around `pivot`, oriented by `forward`.
    ///
    /// The reference forward is captured here and kept until dismissal.
    /// Starting with an empty roster holds an empty ring that later joiners
    /// fill.
    pub fn start_shield(
        &mut self,
        leader: LeaderId,
        pivot: Vec3,
        forward: Vec3,
    ) -> Result<BroadcastReport, CoordinatorError> {
        if self.commandable_members(leader)?.is_none() {
            return Ok(BroadcastReport::default());
        }
        let reference_forward = FormationSolver::reference_forward(forward);
        self.leader_mut(leader)?.shield = Some(ShieldHold {
            pivot,
            reference_forward,
            order: Vec::new(),
        });

        let report = self.resync_shield(leader);
        debug!(%leader, addressed = report.addressed, accepted = report.accepted, "shield started");
        Ok(report)
    }

    /// Moves a held shield to a new pivot, keeping slot order and reference.
    ///
    /// `forward` is only used when no shield is held yet.
    pub fn update_shield(
        &mut self,
        leader: LeaderId,
        pivot: Vec3,
        forward: Vec3,
    ) -> Result<BroadcastReport, CoordinatorError> {
        if self.commandable_members(leader)?.is_none() {
            return Ok(BroadcastReport::default());
        }
        let solver = FormationSolver::new(self.config.maneuvers.shield_radius);
        let owner = self.leader_mut(leader)?;
        let Some(hold) = owner.shield.as_mut() else {
            return self.start_shield(leader, pivot, forward);
        };

        hold.pivot = pivot;
        let slots = solver.assign(pivot, hold.reference_forward, &hold.order);
        Ok(self.apply_shield_slots(pivot, &slots))
    }

    /// Ends the shield hold. Returns how many members left the ring.
    pub fn dismiss_shield(&mut self, leader: LeaderId) -> Result<usize, CoordinatorError> {
        let now = self.now();
        let config = self.config;
        let owner = self.leader_mut(leader)?;
        if owner.shield.take().is_none() {
            return Ok(0);
        }
        let members: Vec<FollowerId> = owner.roster().members().collect();

        let mut released = 0;
        for id in members {
            if let Some(follower) = self.state.followers.get_mut(&id) {
                if follower.exit_shield(now, &config.maneuvers) {
                    released += 1;
                }
            }
        }
        debug!(%leader, released, "shield dismissed");
        Ok(released)
    }

    pub(crate) fn apply_shield_slots(
        &mut self,
        pivot: Vec3,
        slots: &[SlotAssignment],
    ) -> BroadcastReport {
        let now = self.now();
        let tuning = &self.config.maneuvers;
        let mut report = BroadcastReport::default();
        for slot in slots {
            if let Some(follower) = self.state.followers.get_mut(&slot.follower) {
                report.addressed += 1;
                if follower.enter_shield(slot.target, pivot, now, tuning) {
                    report.accepted += 1;
                }
            }
        }
        report
    }
}
