//! Event payloads for each topic.

use herd_core::{Effect, FollowerId, LeaderId, ManeuverKind, Standings};
use serde::{Deserialize, Serialize};

/// A core effect stamped with the step that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationEvent {
    pub frame: u64,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HerdEvent {
    /// An autonomous leader pulled nearby followers into its herd.
    Recruited {
        leader: LeaderId,
        followers: Vec<FollowerId>,
    },

    /// A leader command reached its roster.
    Broadcast {
        leader: LeaderId,
        kind: ManeuverKind,
        addressed: usize,
        accepted: usize,
    },

    ManeuverCompleted {
        follower: FollowerId,
        kind: ManeuverKind,
    },

    /// A hit knocked a leader out and scattered part of its herd.
    LeaderDisrupted {
        leader: LeaderId,
        dropped: Vec<FollowerId>,
        incapacitated_until: f32,
    },

    LeaderRecovered { leader: LeaderId },

    /// What became of a drop list handed to an attacker.
    DropsResolved {
        attacker: LeaderId,
        stolen: Vec<FollowerId>,
        despawned: Vec<FollowerId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started { seed: u64, time_limit_secs: f32 },

    /// The time limit elapsed. Carries the final standings.
    Ended { now: f32, standings: Standings },
}
