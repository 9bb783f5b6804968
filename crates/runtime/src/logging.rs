//! Tracing subscriber setup for hosts.
//!
//! Filtering follows `RUST_LOG` with `info` as the floor. When a log
//! directory is given, output goes to `herd.log` in that directory through a
//! non-blocking writer; otherwise it goes to stderr.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, RuntimeError};

pub const LOG_FILE_NAME: &str = "herd.log";

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for the log file. `None` logs to stderr.
    pub directory: Option<PathBuf>,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl LoggingConfig {
    pub fn stderr() -> Self {
        Self {
            directory: None,
            ansi: true,
        }
    }

    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ansi: false,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for as long as file logging should flush;
/// it is `None` when logging to stderr.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).map_err(|source| RuntimeError::LogDirectory {
                path: directory.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::never(directory, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(config.ansi);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(layer)
                .try_init()
                .map_err(|err| RuntimeError::Logging(err.to_string()))?;
            tracing::info!(directory = %directory.display(), "file logging initialized");
            Ok(Some(guard))
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(layer)
                .try_init()
                .map_err(|err| RuntimeError::Logging(err.to_string()))?;
            Ok(None)
        }
    }
}
