//! Coordinator error types.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, HerdError};
use crate::state::{FollowerId, LeaderId, StateError};

/// Failures of coordinator operations.
///
/// Only genuinely invalid calls land here. Requests that are merely refused
/// by the current state (double join, gated maneuver) succeed with an outcome
/// describing the refusal.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("unknown leader {0}")]
    UnknownLeader(LeaderId),

    #[error("unknown follower {0}")]
    UnknownFollower(FollowerId),

    /// Tick length must be positive and finite.
    #[error("invalid step length {0}")]
    InvalidStep(f32),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl HerdError for CoordinatorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownLeader(_) | Self::UnknownFollower(_) | Self::InvalidStep(_) => {
                ErrorSeverity::Validation
            }
            Self::Oracle(err) => err.severity(),
            Self::State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLeader(_) => "COORDINATOR_UNKNOWN_LEADER",
            Self::UnknownFollower(_) => "COORDINATOR_UNKNOWN_FOLLOWER",
            Self::InvalidStep(_) => "COORDINATOR_INVALID_STEP",
            Self::Oracle(err) => err.error_code(),
            Self::State(err) => err.error_code(),
        }
    }
}
