//! Session clock and end-of-session standings.

use herd_core::{HerdCoordinator, Standings};
use tracing::info;

use crate::config::SessionConfig;

/// Tracks whether the session time limit has elapsed.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    outcome: Option<SessionOutcome>,
}

/// Final result, captured once when the limit is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub ended_at: f32,
    pub standings: Standings,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            outcome: None,
        }
    }

    pub fn time_limit(&self) -> Option<f32> {
        (self.config.time_limit_secs > 0.0).then_some(self.config.time_limit_secs)
    }

    /// Seconds left, or `None` without a limit.
    pub fn remaining(&self, now: f32) -> Option<f32> {
        self.time_limit().map(|limit| (limit - now).max(0.0))
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Ends the session once the limit is reached.
    ///
    /// Returns the outcome only on the call that ends the session.
    pub fn check(&mut self, coordinator: &HerdCoordinator<'_>) -> Option<SessionOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        let limit = self.time_limit()?;
        let now = coordinator.now();
        if now < limit {
            return None;
        }

        let outcome = SessionOutcome {
            ended_at: now,
            standings: coordinator.standings(self.config.standings_size),
        };
        info!(
            ended_at = now,
            player = ?outcome.standings.player,
            rivals = outcome.standings.rivals.len(),
            "session ended"
        );
        self.outcome = Some(outcome.clone());
        Some(outcome)
    }
}
