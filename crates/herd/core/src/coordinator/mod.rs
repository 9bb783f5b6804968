//! Roster brokerage, command broadcast, and the simulation tick.
//!
//! [`HerdCoordinator`] is the only writer of [`HerdState`]. It borrows the
//! state for the duration of a host frame, together with the tunables and
//! the world oracles, and exposes every operation the host may perform.
//! Operations are split across files by concern:
//!
//! - `membership` - join, leave, detach, spawn and removal
//! - `leaders` - pose updates, signals, and recruitment scans
//! - `broadcast` - dash, quick-turn, and shield commands
//! - `tick` - per-frame stepping and proximity joins

mod broadcast;
mod errors;
mod leaders;
mod membership;
mod tick;

pub use errors::CoordinatorError;

use crate::config::HerdConfig;
use crate::env::HerdEnv;
use crate::follower::ManeuverKind;
use crate::leader::{Leader, LeaderCapability};
use crate::state::{FollowerId, HerdState, JoinOrder, LeaderId};

/// Result of a join request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(JoinOrder),
    /// The follower already belongs to this or another leader.
    AlreadyLed(LeaderId),
    /// The leader is incapacitated.
    LeaderUnavailable,
}

impl JoinOutcome {
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined(_))
    }
}

/// How a broadcast was received.
///
/// Every roster member is addressed; each decides for itself whether to act.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub addressed: usize,
    pub accepted: usize,
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub now: f32,
    /// Proximity joins made this tick.
    pub joins: Vec<(FollowerId, LeaderId)>,
    pub completed_maneuvers: Vec<(FollowerId, ManeuverKind)>,
    /// Leaders whose incapacitation ended this tick.
    pub recovered: Vec<LeaderId>,
}

/// Herd size of one leader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HerdStanding {
    pub leader: LeaderId,
    pub size: usize,
}

/// Ranking used for the end-of-session summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standings {
    pub player: Option<HerdStanding>,
    /// Largest autonomous herds first; ties by leader id.
    pub rivals: Vec<HerdStanding>,
}

pub struct HerdCoordinator<'a> {
    pub(crate) state: &'a mut HerdState,
    pub(crate) config: &'a HerdConfig,
    pub(crate) env: HerdEnv<'a>,
}

impl<'a> HerdCoordinator<'a> {
    pub fn new(state: &'a mut HerdState, config: &'a HerdConfig, env: HerdEnv<'a>) -> Self {
        Self { state, config, env }
    }

    pub fn state(&self) -> &HerdState {
        &*self.state
    }

    pub fn config(&self) -> &HerdConfig {
        self.config
    }

    pub fn now(&self) -> f32 {
        self.state.clock.now
    }

    pub fn leader(&self, id: LeaderId) -> Result<&Leader, CoordinatorError> {
        self.state
            .leaders
            .get(&id)
            .ok_or(CoordinatorError::UnknownLeader(id))
    }

    pub(crate) fn leader_mut(&mut self, id: LeaderId) -> Result<&mut Leader, CoordinatorError> {
        self.state
            .leaders
            .get_mut(&id)
            .ok_or(CoordinatorError::UnknownLeader(id))
    }

    /// Player herd size plus the `top` largest autonomous herds.
    pub fn standings(&self, top: usize) -> Standings {
        let mut player = None;
        let mut rivals = Vec::new();
        for leader in self.state.leaders.values() {
            let standing = HerdStanding {
                leader: leader.id,
                size: leader.herd_size(),
            };
            if leader.is_player_controlled() {
                player.get_or_insert(standing);
            } else {
                rivals.push(standing);
            }
        }
        rivals.sort_by(|a, b| b.size.cmp(&a.size).then(a.leader.cmp(&b.leader)));
        rivals.truncate(top);
        Standings { player, rivals }
    }
}

#[cfg(test)]
pub(crate) mod tests;
