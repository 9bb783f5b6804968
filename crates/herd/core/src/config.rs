//! Tunable parameters for the herd simulation.
//!
//! Every value is expressed in world units, seconds, or degrees. Defaults
//! reproduce the feel of the shipped game; hosts override them from files
//! through the `serde` feature.

use crate::error::{ErrorSeverity, HerdError};

/// All simulation tunables, grouped by the component that reads them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HerdConfig {
    pub follower: FollowerTuning,
    pub maneuvers: ManeuverTuning,
    pub disruption: DisruptionTuning,
    pub leader: LeaderTuning,
}

impl HerdConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every tunable is in range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.follower;
        positive("follower.join_distance", f.join_distance)?;
        positive("follower.roam_radius", f.roam_radius)?;
        non_negative("follower.stop_distance", f.stop_distance)?;
        positive("follower.move_speed", f.move_speed)?;
        positive("follower.rotation_speed", f.rotation_speed)?;
        non_negative("follower.gravity", f.gravity)?;
        non_negative("follower.jump_height", f.jump_height)?;
        positive("follower.movement_smooth_time", f.movement_smooth_time)?;
        range(
            "follower.roam_interval",
            f.roam_interval_min,
            f.roam_interval_max,
        )?;
        non_negative("follower.signal_delay_step", f.signal_delay_step)?;
        non_negative("follower.join_scan_interval", f.join_scan_interval)?;
        non_negative("follower.flee_duration", f.flee_duration)?;
        non_negative("follower.flee_distance", f.flee_distance)?;

        let m = &self.maneuvers;
        positive("maneuvers.dash_speed", m.dash_speed)?;
        positive("maneuvers.dash_distance", m.dash_distance)?;
        non_negative("maneuvers.dash_return_delay", m.dash_return_delay)?;
        non_negative("maneuvers.dash_cooldown", m.dash_cooldown)?;
        non_negative(
            "maneuvers.dash_airborne_correction",
            m.dash_airborne_correction,
        )?;
        positive("maneuvers.quick_turn_duration", m.quick_turn_duration)?;
        non_negative("maneuvers.quick_turn_cooldown", m.quick_turn_cooldown)?;
        non_negative("maneuvers.formation_distance", m.formation_distance)?;
        positive("maneuvers.shield_radius", m.shield_radius)?;
        positive(
            "maneuvers.shield_arrive_distance",
            m.shield_arrive_distance,
        )?;
        non_negative("maneuvers.shield_cooldown", m.shield_cooldown)?;

        let d = &self.disruption;
        non_negative("disruption.force_threshold", d.force_threshold)?;
        non_negative(
            "disruption.incapacitation_duration",
            d.incapacitation_duration,
        )?;
        if !(0.0..=1.0).contains(&d.drop_fraction) {
            return Err(ConfigError::OutOfUnitRange {
                field: "disruption.drop_fraction",
                value: d.drop_fraction,
            });
        }

        let l = &self.leader;
        positive("leader.roam_speed", l.roam_speed)?;
        positive("leader.roam_radius", l.roam_radius)?;
        range("leader.roam_interval", l.roam_interval_min, l.roam_interval_max)?;
        positive("leader.rotation_speed", l.rotation_speed)?;
        positive("leader.recruitment_radius", l.recruitment_radius)?;
        non_negative("leader.recruitment_interval", l.recruitment_interval)?;

        Ok(())
    }
}

/// Per-follower movement and roaming tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FollowerTuning {
    /// Distance at which a roaming follower attaches to a leader.
    pub join_distance: f32,
    /// Radius around the roam anchor for random waypoints.
    pub roam_radius: f32,
    /// Dead zone around the leader inside which followers stop moving.
    pub stop_distance: f32,
    pub move_speed: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub gravity: f32,
    /// Apex height of a mimicked jump.
    pub jump_height: f32,
    pub movement_smooth_time: f32,
    pub roam_interval_min: f32,
    pub roam_interval_max: f32,
    /// Delay added per join index before a follower copies a leader signal.
    pub signal_delay_step: f32,
    /// Minimum spacing between proximity scans while roaming.
    pub join_scan_interval: f32,
    /// How long a dropped follower keeps running from the impact.
    pub flee_duration: f32,
    pub flee_distance: f32,
}

impl FollowerTuning {
    pub const DEFAULT_JOIN_DISTANCE: f32 = 4.0;
    pub const DEFAULT_ROAM_RADIUS: f32 = 15.0;
    pub const DEFAULT_STOP_DISTANCE: f32 = 3.5;
    pub const DEFAULT_MOVE_SPEED: f32 = 5.5;
    pub const DEFAULT_ROTATION_SPEED: f32 = 360.0;
    pub const DEFAULT_GRAVITY: f32 = 9.81;
    pub const DEFAULT_JUMP_HEIGHT: f32 = 1.0;
    pub const DEFAULT_MOVEMENT_SMOOTH_TIME: f32 = 0.1;
    pub const DEFAULT_ROAM_INTERVAL_MIN: f32 = 2.0;
    pub const DEFAULT_ROAM_INTERVAL_MAX: f32 = 6.0;
    pub const DEFAULT_SIGNAL_DELAY_STEP: f32 = 0.15;
    pub const DEFAULT_JOIN_SCAN_INTERVAL: f32 = 0.2;
    pub const DEFAULT_FLEE_DURATION: f32 = 2.0;
    pub const DEFAULT_FLEE_DISTANCE: f32 = 8.0;
}

impl Default for FollowerTuning {
    fn default() -> Self {
        Self {
            join_distance: Self::DEFAULT_JOIN_DISTANCE,
            roam_radius: Self::DEFAULT_ROAM_RADIUS,
            stop_distance: Self::DEFAULT_STOP_DISTANCE,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
            gravity: Self::DEFAULT_GRAVITY,
            jump_height: Self::DEFAULT_JUMP_HEIGHT,
            movement_smooth_time: Self::DEFAULT_MOVEMENT_SMOOTH_TIME,
            roam_interval_min: Self::DEFAULT_ROAM_INTERVAL_MIN,
            roam_interval_max: Self::DEFAULT_ROAM_INTERVAL_MAX,
            signal_delay_step: Self::DEFAULT_SIGNAL_DELAY_STEP,
            join_scan_interval: Self::DEFAULT_JOIN_SCAN_INTERVAL,
            flee_duration: Self::DEFAULT_FLEE_DURATION,
            flee_distance: Self::DEFAULT_FLEE_DISTANCE,
        }
    }
}

/// Dash, quick-turn and shield tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManeuverTuning {
    pub dash_speed: f32,
    pub dash_distance: f32,
    /// Pause after a dash before the follower resumes following.
    pub dash_return_delay: f32,
    /// Counted from the end of the recovery pause.
    pub dash_cooldown: f32,
    /// Extra downward speed applied while dashing off the ground.
    pub dash_airborne_correction: f32,
    pub quick_turn_duration: f32,
    /// Counted from the end of the arc.
    pub quick_turn_cooldown: f32,
    /// How far ahead of the pivot the turned formation lands.
    pub formation_distance: f32,
    pub force_clockwise_turn: bool,
    pub shield_radius: f32,
    /// Distance at which a shielding follower snaps onto its slot.
    pub shield_arrive_distance: f32,
    pub shield_cooldown: f32,
}

impl ManeuverTuning {
    pub const DEFAULT_DASH_SPEED: f32 = 15.0;
    pub const DEFAULT_DASH_DISTANCE: f32 = 7.5;
    pub const DEFAULT_DASH_RETURN_DELAY: f32 = 0.5;
    pub const DEFAULT_DASH_COOLDOWN: f32 = 2.0;
    pub const DEFAULT_DASH_AIRBORNE_CORRECTION: f32 = 9.81;
    pub const DEFAULT_QUICK_TURN_DURATION: f32 = 0.5;
    pub const DEFAULT_QUICK_TURN_COOLDOWN: f32 = 2.0;
    pub const DEFAULT_FORMATION_DISTANCE: f32 = 5.0;
    pub const DEFAULT_FORCE_CLOCKWISE_TURN: bool = true;
    pub const DEFAULT_SHIELD_RADIUS: f32 = 3.0;
    pub const DEFAULT_SHIELD_ARRIVE_DISTANCE: f32 = 0.1;
    pub const DEFAULT_SHIELD_COOLDOWN: f32 = 0.0;
}

impl Default for ManeuverTuning {
    fn default() -> Self {
        Self {
            dash_speed: Self::DEFAULT_DASH_SPEED,
            dash_distance: Self::DEFAULT_DASH_DISTANCE,
            dash_return_delay: Self::DEFAULT_DASH_RETURN_DELAY,
            dash_cooldown: Self::DEFAULT_DASH_COOLDOWN,
            dash_airborne_correction: Self::DEFAULT_DASH_AIRBORNE_CORRECTION,
            quick_turn_duration: Self::DEFAULT_QUICK_TURN_DURATION,
            quick_turn_cooldown: Self::DEFAULT_QUICK_TURN_COOLDOWN,
            formation_distance: Self::DEFAULT_FORMATION_DISTANCE,
            force_clockwise_turn: Self::DEFAULT_FORCE_CLOCKWISE_TURN,
            shield_radius: Self::DEFAULT_SHIELD_RADIUS,
            shield_arrive_distance: Self::DEFAULT_SHIELD_ARRIVE_DISTANCE,
            shield_cooldown: Self::DEFAULT_SHIELD_COOLDOWN,
        }
    }
}

/// Impact, mass-drop and steal tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisruptionTuning {
    /// Minimum impact force that incapacitates a leader.
    pub force_threshold: f32,
    pub incapacitation_duration: f32,
    /// Share of the roster dropped on a qualifying impact (floored).
    pub drop_fraction: f32,
    /// How many dropped followers an attacker may take over.
    pub steal_cap: usize,
}

impl DisruptionTuning {
    pub const DEFAULT_FORCE_THRESHOLD: f32 = 10.0;
    pub const DEFAULT_INCAPACITATION_DURATION: f32 = 3.0;
    pub const DEFAULT_DROP_FRACTION: f32 = 0.5;
    pub const DEFAULT_STEAL_CAP: usize = 3;
}

impl Default for DisruptionTuning {
    fn default() -> Self {
        Self {
            force_threshold: Self::DEFAULT_FORCE_THRESHOLD,
            incapacitation_duration: Self::DEFAULT_INCAPACITATION_DURATION,
            drop_fraction: Self::DEFAULT_DROP_FRACTION,
            steal_cap: Self::DEFAULT_STEAL_CAP,
        }
    }
}

/// Autonomous leader tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LeaderTuning {
    pub roam_speed: f32,
    pub roam_radius: f32,
    pub roam_interval_min: f32,
    pub roam_interval_max: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub recruitment_radius: f32,
    pub recruitment_interval: f32,
}

impl LeaderTuning {
    pub const DEFAULT_ROAM_SPEED: f32 = 3.0;
    pub const DEFAULT_ROAM_RADIUS: f32 = 20.0;
    pub const DEFAULT_ROAM_INTERVAL_MIN: f32 = 3.0;
    pub const DEFAULT_ROAM_INTERVAL_MAX: f32 = 8.0;
    pub const DEFAULT_ROTATION_SPEED: f32 = 120.0;
    pub const DEFAULT_RECRUITMENT_RADIUS: f32 = 5.0;
    pub const DEFAULT_RECRUITMENT_INTERVAL: f32 = 1.0;
}

impl Default for LeaderTuning {
    fn default() -> Self {
        Self {
            roam_speed: Self::DEFAULT_ROAM_SPEED,
            roam_radius: Self::DEFAULT_ROAM_RADIUS,
            roam_interval_min: Self::DEFAULT_ROAM_INTERVAL_MIN,
            roam_interval_max: Self::DEFAULT_ROAM_INTERVAL_MAX,
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
            recruitment_radius: Self::DEFAULT_RECRUITMENT_RADIUS,
            recruitment_interval: Self::DEFAULT_RECRUITMENT_INTERVAL,
        }
    }
}

/// Invalid tunable value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },
}

impl HerdError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "CONFIG_NON_POSITIVE",
            Self::Negative { .. } => "CONFIG_NEGATIVE",
            Self::InvertedRange { .. } => "CONFIG_INVERTED_RANGE",
            Self::OutOfUnitRange { .. } => "CONFIG_OUT_OF_UNIT_RANGE",
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    non_negative(field, min)?;
    non_negative(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(HerdConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_roam_interval() {
        let mut config = HerdConfig::default();
        config.leader.roam_interval_min = 9.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_INVERTED_RANGE");
    }

    #[test]
    fn rejects_drop_fraction_above_one() {
        let mut config = HerdConfig::default();
        config.disruption.drop_fraction = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange { .. })
        ));
    }

    #[test]
    fn rejects_nan_speed() {
        let mut config = HerdConfig::default();
        config.follower.move_speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "follower.move_speed", .. })
        ));
    }
}
