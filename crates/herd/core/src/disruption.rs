//! Impacts, mass drops, and steals between rival herds.
//!
//! A hard enough impact knocks a leader out for a while and scatters the
//! newest half of its herd. When the impact came from another leader, that
//! attacker takes over the first few scattered followers; the rest are
//! removed from the world.

use tracing::{debug, info};

use crate::coordinator::{CoordinatorError, HerdCoordinator, JoinOutcome};
use crate::env::Effect;
use crate::state::{FollowerId, LeaderId};

/// Why an impact had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoredImpact {
    BelowThreshold,
    AlreadyIncapacitated,
    /// The attacker is knocked out and cannot land hits.
    AttackerIncapacitated,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImpactOutcome {
    Ignored(IgnoredImpact),
    Disrupted {
        /// Dropped members, newest first.
        dropped: Vec<FollowerId>,
        incapacitated_until: f32,
    },
}

impl ImpactOutcome {
    pub fn dropped(&self) -> &[FollowerId] {
        match self {
            Self::Ignored(_) => &[],
            Self::Disrupted { dropped, .. } => dropped,
        }
    }
}

/// Fate of a drop list handed to an attacker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StealOutcome {
    pub stolen: Vec<FollowerId>,
    pub despawned: Vec<FollowerId>,
}

/// Full result of one leader hitting another.
#[derive(Clone, Debug, PartialEq)]
pub struct HitOutcome {
    pub impact: ImpactOutcome,
    pub steal: StealOutcome,
}

/// Applies disruption rules through a borrowed coordinator.
pub struct DisruptionHandler<'c, 'a> {
    coordinator: &'c mut HerdCoordinator<'a>,
}

impl<'a> HerdCoordinator<'a> {
    pub fn disruption(&mut self) -> DisruptionHandler<'_, 'a> {
        DisruptionHandler::new(self)
    }
}

impl<'c, 'a> DisruptionHandler<'c, 'a> {
    pub fn new(coordinator: &'c mut HerdCoordinator<'a>) -> Self {
        Self { coordinator }
    }

    /// Hits `leader` with `force`.
    ///
    /// At or above the threshold the leader is incapacitated, its shield is
    /// dismissed, and `floor(size * drop_fraction)` of its newest members flee
    /// from it. A leader that is already incapacitated shrugs the hit off.
    pub fn apply_impact(
        &mut self,
        leader: LeaderId,
        force: f32,
    ) -> Result<ImpactOutcome, CoordinatorError> {
        let coordinator = &mut *self.coordinator;
        let now = coordinator.now();
        let tuning = &coordinator.config.disruption;
        let victim = coordinator.leader(leader)?;

        if force < tuning.force_threshold {
            debug!(%leader, force, "impact below threshold");
            return Ok(ImpactOutcome::Ignored(IgnoredImpact::BelowThreshold));
        }
        if victim.is_incapacitated(now) {
            debug!(%leader, force, "impact on incapacitated leader ignored");
            return Ok(ImpactOutcome::Ignored(IgnoredImpact::AlreadyIncapacitated));
        }

        let position = victim.position;
        let drop_count = (victim.herd_size() as f32 * tuning.drop_fraction).floor() as usize;
        let incapacitated_until = now + tuning.incapacitation_duration;

        coordinator.dismiss_shield(leader)?;
        coordinator.leader_mut(leader)?.incapacitated_until = Some(incapacitated_until);
        let dropped = coordinator.detach_most_recent(leader, drop_count, position)?;
        coordinator.env.emit(Effect::Disrupted { leader, position });

        info!(
            %leader,
            force,
            dropped = dropped.len(),
            until = incapacitated_until,
            "leader disrupted"
        );
        Ok(ImpactOutcome::Disrupted {
            dropped,
            incapacitated_until,
        })
    }

    /// `attacker` lands a hit of `force` on `victim`.
    ///
    /// An incapacitated attacker cannot act, so its hits are ignored.
    pub fn resolve_hit(
        &mut self,
        attacker: LeaderId,
        victim: LeaderId,
        force: f32,
    ) -> Result<HitOutcome, CoordinatorError> {
        let now = self.coordinator.now();
        if self.coordinator.leader(attacker)?.is_incapacitated(now) {
            self.coordinator.leader(victim)?;
            debug!(%attacker, %victim, force, "hit from incapacitated attacker ignored");
            return Ok(HitOutcome {
                impact: ImpactOutcome::Ignored(IgnoredImpact::AttackerIncapacitated),
                steal: StealOutcome::default(),
            });
        }
        let impact = self.apply_impact(victim, force)?;
        let steal = if attacker == victim {
            StealOutcome::default()
        } else {
            self.steal_from_drops(attacker, impact.dropped())?
        };
        Ok(HitOutcome { impact, steal })
    }

    /// Hands a drop list to `attacker`.
    ///
    /// The first `steal_cap` entries (in drop order) join the attacker
    /// through the normal join protocol; every later entry is despawned.
    /// Entries that no longer exist are skipped.
    pub fn steal_from_drops(
        &mut self,
        attacker: LeaderId,
        dropped: &[FollowerId],
    ) -> Result<StealOutcome, CoordinatorError> {
        let coordinator = &mut *self.coordinator;
        let cap = coordinator.config.disruption.steal_cap;
        let mut outcome = StealOutcome::default();
        let mut offered = 0;

        for &follower in dropped {
            if coordinator.state.follower(follower).is_none() {
                continue;
            }
            if offered < cap {
                offered += 1;
                if let JoinOutcome::Joined(_) = coordinator.join(follower, attacker)? {
                    outcome.stolen.push(follower);
                }
            } else {
                let removed = coordinator.remove_follower(follower)?;
                coordinator.env.emit(Effect::Despawned {
                    follower,
                    position: removed.position(),
                });
                outcome.despawned.push(follower);
            }
        }

        info!(
            %attacker,
            stolen = outcome.stolen.len(),
            despawned = outcome.despawned.len(),
            "drop list resolved"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::tests::leader_with_members;
    use crate::follower::FollowerState;
    use crate::leader::LeaderKind;
    use crate::math::Vec3;
    use crate::testing::{Fixture, STEP};

    #[test]
    fn hard_impact_drops_the_newest_half() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (leader, members) = leader_with_members(&mut c, 10);

        let outcome = c.disruption().apply_impact(leader, 10.0).unwrap();
        let ImpactOutcome::Disrupted {
            dropped,
            incapacitated_until,
        } = outcome
        else {
            panic!("expected disruption, got {outcome:?}");
        };

        let newest: Vec<FollowerId> = members[5..].iter().rev().copied().collect();
        assert_eq!(dropped, newest);
        assert_eq!(c.state().herd_size(leader), 5);
        assert_eq!(incapacitated_until, 3.0);
        assert!(c.leader(leader).unwrap().is_incapacitated(c.now()));
        for id in &dropped {
            assert!(c.state().follower(*id).unwrap().is_fleeing(c.now()));
        }
        assert_eq!(c.state().validate_membership(), Ok(()));
        drop(c);

        assert_eq!(
            fx.effects.drain().last(),
            Some(&Effect::Disrupted {
                leader,
                position: Vec3::ZERO
            })
        );
    }

    #[test]
    fn weak_or_repeated_impacts_are_ignored() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (leader, _) = leader_with_members(&mut c, 4);

        assert_eq!(
            c.disruption().apply_impact(leader, 9.99).unwrap(),
            ImpactOutcome::Ignored(IgnoredImpact::BelowThreshold)
        );
        assert_eq!(c.state().herd_size(leader), 4);

        c.disruption().apply_impact(leader, 50.0).unwrap();
        assert_eq!(
            c.disruption().apply_impact(leader, 50.0).unwrap(),
            ImpactOutcome::Ignored(IgnoredImpact::AlreadyIncapacitated)
        );
        assert_eq!(c.state().herd_size(leader), 2);
    }

    #[test]
    fn single_member_herd_keeps_its_follower() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (leader, _) = leader_with_members(&mut c, 1);

        let outcome = c.disruption().apply_impact(leader, 20.0).unwrap();
        assert!(outcome.dropped().is_empty());
        assert_eq!(c.state().herd_size(leader), 1);
        assert!(c.leader(leader).unwrap().is_incapacitated(c.now()));
    }

    #[test]
    fn impact_breaks_a_held_shield() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (leader, members) = leader_with_members(&mut c, 4);
        c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();

        c.disruption().apply_impact(leader, 15.0).unwrap();
        assert!(c.leader(leader).unwrap().shield.is_none());
        for id in &members[..2] {
            assert_eq!(
                c.state().follower(*id).unwrap().state(),
                FollowerState::Following
            );
        }
    }

    #[test]
    fn leader_recovers_after_incapacitation() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (leader, _) = leader_with_members(&mut c, 2);
        c.disruption().apply_impact(leader, 15.0).unwrap();

        let mut recovered_at = None;
        for _ in 0..400 {
            let report = c.tick(STEP).unwrap();
            if report.recovered.contains(&leader) {
                recovered_at = Some(report.now);
                break;
            }
        }
        let recovered_at = recovered_at.expect("leader never recovered");
        assert!((recovered_at - 3.0).abs() <= STEP * 1.5);
        assert!(c.signal(leader).unwrap());
    }

    #[test]
    fn attacker_steals_up_to_the_cap_and_the_rest_despawn() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (victim, _) = leader_with_members(&mut c, 12);
        let attacker = c
            .add_leader(
                LeaderKind::autonomous_at(Vec3::new(5.0, 0.0, 0.0)),
                Vec3::new(5.0, 0.0, 0.0),
                0.0,
            )
            .unwrap();

        let hit = c.disruption().resolve_hit(attacker, victim, 25.0).unwrap();
        let dropped = hit.impact.dropped().to_vec();
        assert_eq!(dropped.len(), 6);
        assert_eq!(hit.steal.stolen, dropped[..3].to_vec());
        assert_eq!(hit.steal.despawned, dropped[3..].to_vec());

        assert_eq!(c.state().herd_size(victim), 6);
        assert_eq!(c.state().herd_size(attacker), 3);
        for id in &hit.steal.despawned {
            assert!(c.state().follower(*id).is_none());
        }
        for id in &hit.steal.stolen {
            let follower = c.state().follower(*id).unwrap();
            assert_eq!(follower.leader(), Some(attacker));
            assert!(!follower.is_fleeing(c.now()));
        }
        assert_eq!(c.state().validate_membership(), Ok(()));
        drop(c);

        let despawns = fx
            .effects
            .drain()
            .into_iter()
            .filter(|effect| matches!(effect, Effect::Despawned { .. }))
            .count();
        assert_eq!(despawns, 3);
    }

    #[test]
    fn incapacitated_attacker_cannot_land_a_hit() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (victim, members) = leader_with_members(&mut c, 12);
        let attacker = c
            .add_leader(
                LeaderKind::autonomous_at(Vec3::new(5.0, 0.0, 0.0)),
                Vec3::new(5.0, 0.0, 0.0),
                0.0,
            )
            .unwrap();
        c.disruption().apply_impact(attacker, 50.0).unwrap();

        let hit = c.disruption().resolve_hit(attacker, victim, 25.0).unwrap();

        assert_eq!(
            hit.impact,
            ImpactOutcome::Ignored(IgnoredImpact::AttackerIncapacitated)
        );
        assert_eq!(hit.steal, StealOutcome::default());
        assert_eq!(c.state().herd_size(victim), 12);
        assert!(!c.leader(victim).unwrap().is_incapacitated(c.now()));
        for id in &members {
            assert_eq!(c.state().follower(*id).unwrap().leader(), Some(victim));
        }
        assert_eq!(c.state().validate_membership(), Ok(()));
    }

    #[test]
    fn steal_skips_followers_that_no_longer_exist() {
        let mut fx = Fixture::new();
        let mut c = fx.coordinator();
        let (attacker, _) = leader_with_members(&mut c, 0);
        let a = c.add_follower(Vec3::ZERO, 0.0).unwrap();
        let b = c.add_follower(Vec3::ZERO, 0.0).unwrap();
        c.remove_follower(a).unwrap();

        let outcome = c.disruption().steal_from_drops(attacker, &[a, b]).unwrap();
        assert_eq!(outcome.stolen, vec![b]);
        assert!(outcome.despawned.is_empty());
    }
}
