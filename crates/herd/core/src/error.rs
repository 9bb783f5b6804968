//! Common error infrastructure for herd-core.
//!
//! Domain-specific errors (`CoordinatorError`, `ConfigError`, `OracleError`,
//! `StateError`) live next to the code that raises them. This module only
//! provides the shared classification used by hosts to decide how to react.
//!
//! Expected no-ops (joining twice, leaving without a leader, a maneuver refused
//! by cooldown) are reported as `Ok` outcomes and never reach this layer.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the call may succeed later without changes
/// - **Validation**: the caller passed something invalid
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry later.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown leader id, negative tunable
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: roster and leader reference disagree
    Internal,

    /// Fatal error - the simulation cannot proceed.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all herd-core errors.
///
/// All error enums in the crate derive `thiserror::Error` and implement this
/// trait so hosts can log and route them uniformly.
pub trait HerdError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
