//! State consistency errors.

use crate::error::{ErrorSeverity, HerdError};
use crate::state::{FollowerId, JoinOrder, LeaderId};

/// Violations of the arena's bookkeeping invariants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// Identifier space exhausted.
    #[error("{kind} id overflow")]
    IdOverflow { kind: &'static str },

    /// A roster lists a follower that does not exist.
    #[error("roster of {leader} lists unknown follower {follower}")]
    DanglingMember {
        leader: LeaderId,
        follower: FollowerId,
    },

    /// A roster lists a follower whose leader reference points elsewhere.
    #[error("{follower} is in the roster of {leader} but references {found:?}")]
    MembershipMismatch {
        leader: LeaderId,
        follower: FollowerId,
        found: Option<LeaderId>,
    },

    /// A follower references a leader whose roster does not contain it.
    #[error("{follower} references {leader} but is not in its roster")]
    MissingFromRoster {
        leader: LeaderId,
        follower: FollowerId,
    },

    /// Two members of one roster share a join order.
    #[error("roster of {leader} assigns join order {order} twice")]
    DuplicateJoinOrder { leader: LeaderId, order: JoinOrder },
}

impl HerdError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IdOverflow { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IdOverflow { .. } => "STATE_ID_OVERFLOW",
            Self::DanglingMember { .. } => "STATE_DANGLING_MEMBER",
            Self::MembershipMismatch { .. } => "STATE_MEMBERSHIP_MISMATCH",
            Self::MissingFromRoster { .. } => "STATE_MISSING_FROM_ROSTER",
            Self::DuplicateJoinOrder { .. } => "STATE_DUPLICATE_JOIN_ORDER",
        }
    }
}
