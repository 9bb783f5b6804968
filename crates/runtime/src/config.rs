//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! [simulation]
//! fixed_step = 0.016666668
//! seed = 42
//!
//! [session]
//! time_limit_secs = 300.0
//!
//! [herd.maneuvers]
//! dash_speed = 18.0
//! ```
//!
//! Every table and field is optional; omitted values keep their defaults.

use std::path::Path;

use herd_core::HerdConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub herd: HerdConfig,
    pub simulation: SimulationConfig,
    pub session: SessionConfig,
    pub events: EventConfig,
}

/// Fixed-step driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation step in seconds.
    pub fixed_step: f32,
    /// Upper bound on steps per host frame; excess time is discarded.
    pub max_steps_per_frame: u32,
    /// Session seed for every random draw.
    pub seed: u64,
}

impl SimulationConfig {
    pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
    pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;
    pub const DEFAULT_SEED: u64 = 0;
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_step: Self::DEFAULT_FIXED_STEP,
            max_steps_per_frame: Self::DEFAULT_MAX_STEPS_PER_FRAME,
            seed: Self::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sim seconds until the session ends. Zero or less disables the limit.
    pub time_limit_secs: f32,
    /// Number of rival herds listed in the final standings.
    pub standings_size: usize,
}

impl SessionConfig {
    pub const DEFAULT_TIME_LIMIT_SECS: f32 = 300.0;
    pub const DEFAULT_STANDINGS_SIZE: usize = 3;
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: Self::DEFAULT_TIME_LIMIT_SECS,
            standings_size: Self::DEFAULT_STANDINGS_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Buffered events per topic before slow subscribers start lagging.
    pub capacity: usize,
}

impl EventConfig {
    pub const DEFAULT_CAPACITY: usize = 256;
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "runtime config loaded");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.herd.validate()?;

        let step = self.simulation.fixed_step;
        if !(step.is_finite() && step > 0.0) {
            return Err(RuntimeError::InvalidSetting {
                field: "simulation.fixed_step",
                reason: format!("must be positive, got {step}"),
            });
        }
        if self.simulation.max_steps_per_frame == 0 {
            return Err(RuntimeError::InvalidSetting {
                field: "simulation.max_steps_per_frame",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.events.capacity == 0 {
            return Err(RuntimeError::InvalidSetting {
                field: "events.capacity",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.session.time_limit_secs, 300.0);
        assert_eq!(config.session.standings_size, 3);
    }

    #[test]
    fn partial_tables_override_only_named_fields() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [simulation]
            seed = 7

            [herd.maneuvers]
            dash_speed = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(
            config.simulation.fixed_step,
            SimulationConfig::DEFAULT_FIXED_STEP
        );
        assert_eq!(config.herd.maneuvers.dash_speed, 20.0);
        assert_eq!(config.herd.maneuvers.dash_distance, 7.5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = RuntimeConfig::from_toml_str("[simulation]\nfixed_step = 0.0").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidSetting {
                field: "simulation.fixed_step",
                ..
            }
        ));

        let err = RuntimeConfig::from_toml_str("[herd.follower]\nmove_speed = -1.0").unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));

        let err = RuntimeConfig::from_toml_str("[simulation\nseed = 1").unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigParse(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\ntime_limit_secs = 60.0").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.session.time_limit_secs, 60.0);

        let missing = RuntimeConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(RuntimeError::ConfigIo { .. })));
    }
}
