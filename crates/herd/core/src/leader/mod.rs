//! Agents that can own a herd.
//!
//! [`LeaderCapability`] is the contract followers see. [`Leader`] is the
//! concrete agent stored in [`HerdState`](crate::HerdState); player and
//! autonomous leaders share it and differ only by [`LeaderKind`].
mod roster;

pub use roster::{Roster, RosterEntry};

use crate::math::{Vec3, yaw_forward};
use crate::state::{FollowerId, JoinOrder, LeaderId, RoamPlan, StateError};

/// What a follower needs from the agent it follows.
pub trait LeaderCapability {
    fn leader_id(&self) -> LeaderId;

    fn position(&self) -> Vec3;

    /// Yaw in degrees.
    fn heading(&self) -> f32;

    fn velocity(&self) -> Vec3;

    fn is_player_controlled(&self) -> bool;

    /// Sim time of the last mimicable action (a jump), if any.
    fn last_signal_time(&self) -> Option<f32>;

    /// Whether new followers may attach at `now`.
    fn accepts_recruits(&self, now: f32) -> bool;

    /// Adds `follower` to the roster and returns its join order.
    ///
    /// Never hands out the same order to two current members.
    fn register_follower(&mut self, follower: FollowerId) -> Result<JoinOrder, StateError>;

    /// Removes `follower` from the roster. Returns false if it was not a member.
    fn unregister_follower(&mut self, follower: FollowerId) -> bool;
}

/// Who steers a leader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeaderKind {
    /// Steered by host input.
    Player,
    /// Steered by the runtime's leader brain, wandering around its anchor.
    Autonomous { roam: RoamPlan },
}

impl LeaderKind {
    /// Autonomous leader wandering around `anchor`.
    pub const fn autonomous_at(anchor: Vec3) -> Self {
        Self::Autonomous {
            roam: RoamPlan::anchored_at(anchor),
        }
    }
}

/// Ring formation held by a leader until dismissed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldHold {
    pub pivot: Vec3,
    /// Captured when the hold starts and kept until it ends.
    pub reference_forward: Vec3,
    /// Members in slot order.
    pub order: Vec<FollowerId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leader {
    pub id: LeaderId,
    pub kind: LeaderKind,
    pub position: Vec3,
    /// Yaw in degrees.
    pub heading: f32,
    pub velocity: Vec3,
    pub last_signal_time: Option<f32>,
    pub incapacitated_until: Option<f32>,
    /// Earliest sim time for the next recruitment scan.
    pub next_recruit_at: f32,
    pub shield: Option<ShieldHold>,
    roster: Roster,
}

impl Leader {
    pub fn new(id: LeaderId, kind: LeaderKind, position: Vec3, heading: f32) -> Self {
        Self {
            id,
            kind,
            position,
            heading,
            velocity: Vec3::ZERO,
            last_signal_time: None,
            incapacitated_until: None,
            next_recruit_at: 0.0,
            shield: None,
            roster: Roster::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn herd_size(&self) -> usize {
        self.roster.len()
    }

    pub fn is_incapacitated(&self, now: f32) -> bool {
        self.incapacitated_until.is_some_and(|until| now < until)
    }

    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.heading)
    }

    pub fn roam_plan(&self) -> Option<&RoamPlan> {
        match &self.kind {
            LeaderKind::Autonomous { roam } => Some(roam),
            LeaderKind::Player => None,
        }
    }

    pub fn roam_plan_mut(&mut self) -> Option<&mut RoamPlan> {
        match &mut self.kind {
            LeaderKind::Autonomous { roam } => Some(roam),
            LeaderKind::Player => None,
        }
    }
}

impl LeaderCapability for Leader {
    fn leader_id(&self) -> LeaderId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn heading(&self) -> f32 {
        self.heading
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn is_player_controlled(&self) -> bool {
        matches!(self.kind, LeaderKind::Player)
    }

    fn last_signal_time(&self) -> Option<f32> {
        self.last_signal_time
    }

    fn accepts_recruits(&self, now: f32) -> bool {
        !self.is_incapacitated(now)
    }

    fn register_follower(&mut self, follower: FollowerId) -> Result<JoinOrder, StateError> {
        self.roster.register(follower)
    }

    fn unregister_follower(&mut self, follower: FollowerId) -> bool {
        self.roster.unregister(follower)
    }
}
