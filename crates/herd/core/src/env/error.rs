//! Oracle access errors.

use crate::error::{ErrorSeverity, HerdError};

/// Errors that occur when a required oracle is missing from the [`Env`](super::Env).
///
/// Ground queries that simply find no surface are not errors; they return
/// `None` from [`GroundOracle::sample`](super::GroundOracle::sample).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// GroundOracle is not available in the environment.
    #[error("GroundOracle not available")]
    GroundNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl HerdError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // Missing oracles are fatal - the coordinator cannot step without them
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GroundNotAvailable => "ORACLE_GROUND_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
