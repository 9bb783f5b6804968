//! Per-frame stepping.

use tracing::{info, trace, warn};

use super::{CoordinatorError, HerdCoordinator, JoinOutcome, TickReport};
use crate::follower::StepContext;
use crate::leader::LeaderCapability;
use crate::state::{FollowerId, HerdState, LeaderId};

impl HerdCoordinator<'_> {
    /// Advances the simulation by `dt` seconds.
    ///
    /// Order within a tick: the clock advances, expired incapacitations end,
    /// every follower moves (roam, follow, or maneuver) and then falls, and
    /// finally roaming followers whose scan is due attach to the nearest
    /// leader in reach.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive step or when the ground or rng oracle is missing.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport, CoordinatorError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(CoordinatorError::InvalidStep(dt));
        }
        let ground = self.env.ground()?;
        let rng = self.env.rng()?;

        self.state.clock.advance(dt);
        let now = self.state.clock.now;
        let frame = self.state.clock.frame;
        let mut report = TickReport {
            frame,
            now,
            ..TickReport::default()
        };

        for leader in self.state.leaders.values_mut() {
            let expired = leader.incapacitated_until.is_some_and(|until| now >= until);
            if expired {
                leader.incapacitated_until = None;
                info!(leader = %leader.id, "leader recovered");
                report.recovered.push(leader.id);
            }
        }

        let ctx = StepContext {
            now,
            dt,
            seed: self.state.seed,
            frame,
            config: self.config,
            ground,
            rng,
        };
        let HerdState {
            leaders, followers, ..
        } = &mut *self.state;

        for follower in followers.values_mut() {
            match follower.leader() {
                None => follower.roam_step(&ctx),
                Some(leader_id) => match leaders.get(&leader_id) {
                    Some(leader) => {
                        if follower.maneuver().is_some() {
                            if let Some(kind) = follower.advance_maneuver(&ctx) {
                                report.completed_maneuvers.push((follower.id, kind));
                            }
                        } else {
                            follower.follow_step(leader, &ctx);
                        }
                    }
                    None => {
                        warn!(
                            follower = %follower.id,
                            leader = %leader_id,
                            "leader reference is stale; holding position"
                        );
                    }
                },
            }
            follower.apply_gravity(&ctx);
        }

        for (follower, leader) in self.due_proximity_joins(now) {
            if let JoinOutcome::Joined(_) = self.join(follower, leader)? {
                report.joins.push((follower, leader));
            }
        }

        trace!(frame, now, joins = report.joins.len(), "tick");
        Ok(report)
    }

    /// Runs the proximity scan for every roaming follower that is due.
    ///
    /// Picks the nearest leader accepting recruits within join distance; ties
    /// go to the lower leader id.
    fn due_proximity_joins(&mut self, now: f32) -> Vec<(FollowerId, LeaderId)> {
        let tuning = &self.config.follower;
        let HerdState {
            leaders, followers, ..
        } = &mut *self.state;

        let mut candidates = Vec::new();
        for follower in followers.values_mut() {
            if !follower.wants_leader_scan(now) {
                continue;
            }
            follower.schedule_leader_scan(now, tuning.join_scan_interval);

            let nearest = leaders
                .values()
                .filter(|leader| leader.accepts_recruits(now))
                .map(|leader| (leader.position.distance(follower.position()), leader.id))
                .filter(|(distance, _)| *distance <= tuning.join_distance)
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            if let Some((_, leader)) = nearest {
                candidates.push((follower.id, leader));
            }
        }
        candidates
    }
}
