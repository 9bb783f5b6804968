//! Errors surfaced by the runtime API.
//!
//! Core failures pass through unchanged so hosts can still classify them by
//! [`HerdError::severity`].

use std::path::PathBuf;

use herd_core::{ConfigError, CoordinatorError, ErrorSeverity, HerdError, LeaderId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("failed to create log directory {path}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Logging(String),

    #[error("session already ended")]
    SessionEnded,

    #[error("no player leader has been spawned")]
    NoPlayer,

    #[error("player leader {0} already spawned")]
    PlayerExists(LeaderId),
}

impl HerdError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Coordinator(err) => err.severity(),
            Self::Config(err) => err.severity(),
            Self::ConfigParse(_) | Self::InvalidSetting { .. } => ErrorSeverity::Validation,
            Self::ConfigIo { .. } | Self::LogDirectory { .. } => ErrorSeverity::Recoverable,
            Self::Logging(_) => ErrorSeverity::Fatal,
            Self::SessionEnded | Self::NoPlayer | Self::PlayerExists(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Coordinator(err) => err.error_code(),
            Self::Config(err) => err.error_code(),
            Self::ConfigIo { .. } => "RUNTIME_CONFIG_IO",
            Self::ConfigParse(_) => "RUNTIME_CONFIG_PARSE",
            Self::InvalidSetting { .. } => "RUNTIME_INVALID_SETTING",
            Self::LogDirectory { .. } => "RUNTIME_LOG_DIRECTORY",
            Self::Logging(_) => "RUNTIME_LOGGING",
            Self::SessionEnded => "RUNTIME_SESSION_ENDED",
            Self::NoPlayer => "RUNTIME_NO_PLAYER",
            Self::PlayerExists(_) => "RUNTIME_PLAYER_EXISTS",
        }
    }
}
