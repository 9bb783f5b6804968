//! Authoritative simulation state.
//!
//! [`HerdState`] is a plain arena of leaders and followers keyed by id. It is
//! mutated through [`HerdCoordinator`](crate::HerdCoordinator), which keeps
//! each roster and its members' leader references in agreement.
mod clock;
mod error;
mod ids;
mod roam;

pub use clock::SimClock;
pub use error::StateError;
pub use ids::{FollowerId, JoinOrder, LeaderId};
pub use roam::RoamPlan;

use std::collections::{BTreeMap, BTreeSet};

use crate::follower::Follower;
use crate::leader::Leader;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HerdState {
    /// Session seed for every random draw.
    ///
    /// Set once at session start and never modified.
    pub seed: u64,
    pub clock: SimClock,
    pub leaders: BTreeMap<LeaderId, Leader>,
    pub followers: BTreeMap<FollowerId, Follower>,

    /// Monotonic id allocators. Ids are never reused.
    next_leader_id: u32,
    next_follower_id: u32,
}

impl HerdState {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn now(&self) -> f32 {
        self.clock.now
    }

    pub fn leader(&self, id: LeaderId) -> Option<&Leader> {
        self.leaders.get(&id)
    }

    pub fn follower(&self, id: FollowerId) -> Option<&Follower> {
        self.followers.get(&id)
    }

    pub fn herd_size(&self, id: LeaderId) -> usize {
        self.leader(id).map_or(0, Leader::herd_size)
    }

    pub(crate) fn allocate_leader_id(&mut self) -> Result<LeaderId, StateError> {
        let id = LeaderId(self.next_leader_id);
        self.next_leader_id = self
            .next_leader_id
            .checked_add(1)
            .ok_or(StateError::IdOverflow { kind: "leader" })?;
        Ok(id)
    }

    pub(crate) fn allocate_follower_id(&mut self) -> Result<FollowerId, StateError> {
        let id = FollowerId(self.next_follower_id);
        self.next_follower_id = self
            .next_follower_id
            .checked_add(1)
            .ok_or(StateError::IdOverflow { kind: "follower" })?;
        Ok(id)
    }

    /// Checks that every roster agrees with its members' leader references
    /// and that no roster hands out a join order twice.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate_membership(&self) -> Result<(), StateError> {
        for (leader_id, leader) in &self.leaders {
            let mut orders = BTreeSet::new();
            for entry in leader.roster().entries() {
                let follower = self.followers.get(&entry.follower).ok_or(
                    StateError::DanglingMember {
                        leader: *leader_id,
                        follower: entry.follower,
                    },
                )?;
                if follower.leader() != Some(*leader_id) {
                    return Err(StateError::MembershipMismatch {
                        leader: *leader_id,
                        follower: entry.follower,
                        found: follower.leader(),
                    });
                }
                if !orders.insert(entry.order) {
                    return Err(StateError::DuplicateJoinOrder {
                        leader: *leader_id,
                        order: entry.order,
                    });
                }
            }
        }

        for (follower_id, follower) in &self.followers {
            if let Some(leader_id) = follower.leader() {
                let listed = self
                    .leaders
                    .get(&leader_id)
                    .is_some_and(|leader| leader.roster().contains(*follower_id));
                if !listed {
                    return Err(StateError::MissingFromRoster {
                        leader: leader_id,
                        follower: *follower_id,
                    });
                }
            }
        }

        Ok(())
    }
}
