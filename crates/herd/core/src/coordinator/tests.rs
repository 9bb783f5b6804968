use approx::assert_relative_eq;

use super::*;
use crate::env::{Effect, Env, FlatGround, PcgRng};
use crate::follower::{DashPhase, FollowerState, Maneuver, ManeuverKind};
use crate::leader::LeaderKind;
use crate::math::Vec3;
use crate::state::{FollowerId, HerdState, JoinOrder, LeaderId};
use crate::testing::{Fixture, STEP};

/// Spawns a player leader at the origin with `count` members around it.
pub(crate) fn leader_with_members(
    coordinator: &mut HerdCoordinator<'_>,
    count: usize,
) -> (LeaderId, Vec<FollowerId>) {
    let leader = coordinator
        .add_leader(LeaderKind::Player, Vec3::ZERO, 0.0)
        .unwrap();
    let members = (0..count)
        .map(|i| {
            let angle = i as f32 * 360.0 / count.max(1) as f32;
            let position = Vec3::FORWARD.rotate_y(angle) * 2.0;
            let follower = coordinator.add_follower(position, 0.0).unwrap();
            assert!(coordinator.join(follower, leader).unwrap().is_joined());
            follower
        })
        .collect();
    (leader, members)
}

fn shield_slot(coordinator: &HerdCoordinator<'_>, follower: FollowerId) -> Vec3 {
    match coordinator.state().follower(follower).unwrap().maneuver() {
        Some(Maneuver::Shield(shield)) => shield.slot,
        other => panic!("expected shield, got {other:?}"),
    }
}

#[test]
fn join_orders_are_distinct_and_membership_stays_symmetric() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 5);

    let orders: Vec<u32> = members
        .iter()
        .map(|id| c.state().follower(*id).unwrap().join_order().unwrap().get())
        .collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);

    assert!(c.leave(members[0]).unwrap());
    let late = c.add_follower(Vec3::ZERO, 0.0).unwrap();
    assert_eq!(c.join(late, leader).unwrap(), JoinOutcome::Joined(JoinOrder(6)));
    assert_eq!(c.state().validate_membership(), Ok(()));
}

#[test]
fn double_join_is_ignored() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (first, members) = leader_with_members(&mut c, 1);
    let second = c
        .add_leader(LeaderKind::autonomous_at(Vec3::ZERO), Vec3::ZERO, 0.0)
        .unwrap();

    assert_eq!(
        c.join(members[0], second).unwrap(),
        JoinOutcome::AlreadyLed(first)
    );
    assert_eq!(c.state().herd_size(second), 0);
    assert_eq!(c.state().validate_membership(), Ok(()));
}

#[test]
fn leaving_without_a_leader_is_a_noop() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, _) = leader_with_members(&mut c, 2);
    let loner = c.add_follower(Vec3::new(30.0, 0.0, 0.0), 0.0).unwrap();

    assert!(!c.leave(loner).unwrap());
    assert_eq!(c.state().herd_size(leader), 2);
    assert_eq!(
        c.state().follower(loner).unwrap().state(),
        FollowerState::Roaming
    );
}

#[test]
fn unknown_ids_are_errors() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, _) = leader_with_members(&mut c, 0);

    assert_eq!(
        c.join(FollowerId(99), leader),
        Err(CoordinatorError::UnknownFollower(FollowerId(99)))
    );
    assert_eq!(
        c.broadcast_dash(LeaderId(42), Vec3::FORWARD),
        Err(CoordinatorError::UnknownLeader(LeaderId(42)))
    );
}

#[test]
fn roaming_follower_joins_the_nearest_leader_on_tick() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let near = c
        .add_leader(LeaderKind::Player, Vec3::new(2.0, 0.0, 0.0), 0.0)
        .unwrap();
    let far = c
        .add_leader(
            LeaderKind::autonomous_at(Vec3::new(-3.5, 0.0, 0.0)),
            Vec3::new(-3.5, 0.0, 0.0),
            0.0,
        )
        .unwrap();
    let follower = c.add_follower(Vec3::ZERO, 0.0).unwrap();

    let report = c.tick(STEP).unwrap();
    assert_eq!(report.joins, vec![(follower, near)]);
    assert_eq!(c.state().herd_size(far), 0);
    drop(c);

    assert_eq!(
        fx.effects.drain(),
        vec![Effect::Joined {
            follower,
            leader: near,
            join_order: JoinOrder(1),
        }]
    );
}

#[test]
fn incapacitated_leader_refuses_joins_signals_and_commands() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, _) = leader_with_members(&mut c, 2);
    c.leader_mut(leader).unwrap().incapacitated_until = Some(5.0);
    let newcomer = c.add_follower(Vec3::new(1.0, 0.0, 0.0), 0.0).unwrap();

    assert_eq!(
        c.join(newcomer, leader).unwrap(),
        JoinOutcome::LeaderUnavailable
    );
    assert!(!c.signal(leader).unwrap());
    assert_eq!(
        c.broadcast_dash(leader, Vec3::FORWARD).unwrap(),
        BroadcastReport::default()
    );
}

#[test]
fn removing_a_leader_releases_every_follower() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 3);

    let released = c.remove_leader(leader).unwrap();
    assert_eq!(released, members);
    for id in &members {
        let follower = c.state().follower(*id).unwrap();
        assert_eq!(follower.state(), FollowerState::Roaming);
        assert_eq!(follower.leader(), None);
    }
    assert_eq!(c.state().validate_membership(), Ok(()));
}

#[test]
fn stale_leader_reference_holds_position() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 1);
    // Simulate abrupt removal that bypasses remove_leader.
    c.state.leaders.remove(&leader);
    let before = c.state().follower(members[0]).unwrap().position();

    c.tick(STEP).unwrap();
    let follower = c.state().follower(members[0]).unwrap();
    assert_eq!(follower.state(), FollowerState::Following);
    assert_relative_eq!(follower.position().x, before.x);
    assert_relative_eq!(follower.position().z, before.z);
}

#[test]
fn detach_most_recent_is_lifo_and_sends_followers_fleeing() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 5);

    let dropped = c.detach_most_recent(leader, 2, Vec3::ZERO).unwrap();
    assert_eq!(dropped, vec![members[4], members[3]]);
    assert_eq!(c.state().herd_size(leader), 3);

    let now = c.now();
    for id in &dropped {
        let follower = c.state().follower(*id).unwrap();
        assert_eq!(follower.state(), FollowerState::Roaming);
        assert!(follower.is_fleeing(now));
        let outward = follower.position().horizontal().normalize();
        let heading_out = (follower.roam.target - follower.position()).normalize();
        assert!(outward.dot(heading_out) > 0.99);
    }

    let clamped = c.detach_most_recent(leader, 50, Vec3::ZERO).unwrap();
    assert_eq!(clamped.len(), 3);
    assert_eq!(c.state().validate_membership(), Ok(()));
}

#[test]
fn fleeing_followers_do_not_rejoin_until_the_flee_ends() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 1);
    c.detach_most_recent(leader, 1, Vec3::ZERO).unwrap();

    // Still within join distance on the first tick, but fleeing.
    let report = c.tick(STEP).unwrap();
    assert!(report.joins.is_empty());
    assert_eq!(c.state().follower(members[0]).unwrap().leader(), None);
}

#[test]
fn empty_shield_is_not_an_error() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, _) = leader_with_members(&mut c, 0);

    let report = c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();
    assert_eq!(report, BroadcastReport::default());
    let hold = c.leader(leader).unwrap().shield.as_ref().unwrap();
    assert!(hold.order.is_empty());
}

#[test]
fn four_member_shield_uses_quarter_slots() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 4);

    let report = c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();
    assert_eq!(report.accepted, 4);

    let mut angles: Vec<f32> = members
        .iter()
        .map(|id| shield_slot(&c, *id).yaw())
        .collect();
    angles.sort_by(f32::total_cmp);
    for (angle, expected) in angles.iter().zip([-135.0, -45.0, 45.0, 135.0]) {
        assert_relative_eq!(*angle, expected, epsilon = 1e-3);
    }
}

#[test]
fn shield_slots_ignore_leader_turning() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 4);
    c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();
    let before: Vec<Vec3> = members.iter().map(|id| shield_slot(&c, *id)).collect();

    c.set_leader_pose(leader, Vec3::ZERO, 90.0, Vec3::ZERO)
        .unwrap();
    c.update_shield(leader, Vec3::ZERO, Vec3::RIGHT).unwrap();
    c.tick(STEP).unwrap();

    let after: Vec<Vec3> = members.iter().map(|id| shield_slot(&c, *id)).collect();
    assert_eq!(before, after);
}

#[test]
fn shield_is_resolved_when_membership_changes() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 4);
    c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();

    c.leave(members[0]).unwrap();
    let hold = c.leader(leader).unwrap().shield.as_ref().unwrap();
    assert_eq!(hold.order.len(), 3);

    let mut angles: Vec<f32> = members[1..]
        .iter()
        .map(|id| shield_slot(&c, *id).yaw())
        .collect();
    angles.sort_by(f32::total_cmp);
    for (angle, expected) in angles.iter().zip([-120.0, 0.0, 120.0]) {
        assert_relative_eq!(*angle, expected, epsilon = 1e-3);
    }

    // A newcomer is slotted into the ring as well.
    let newcomer = c.add_follower(Vec3::new(0.0, 0.0, -1.0), 0.0).unwrap();
    c.join(newcomer, leader).unwrap();
    assert_eq!(
        c.state().follower(newcomer).unwrap().state(),
        FollowerState::Shielding
    );
}

#[test]
fn dismiss_returns_members_to_following() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 3);
    c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();

    assert_eq!(c.dismiss_shield(leader).unwrap(), 3);
    assert!(c.leader(leader).unwrap().shield.is_none());
    for id in &members {
        assert_eq!(
            c.state().follower(*id).unwrap().state(),
            FollowerState::Following
        );
    }
    assert_eq!(c.dismiss_shield(leader).unwrap(), 0);
}

#[test]
fn dash_takes_distance_over_speed_and_cools_down_after_recovery() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 1);
    let follower = members[0];
    let tuning = c.config().maneuvers.clone();

    let started_at = c.now();
    assert_eq!(c.broadcast_dash(leader, Vec3::FORWARD).unwrap().accepted, 1);

    let mut travel_ticks = 0;
    loop {
        c.tick(STEP).unwrap();
        travel_ticks += 1;
        match c.state().follower(follower).unwrap().maneuver() {
            Some(Maneuver::Dash(dash)) if dash.phase == DashPhase::Travel => {}
            _ => break,
        }
        assert!(travel_ticks < 600);
    }
    let expected = (tuning.dash_distance / tuning.dash_speed / STEP).round() as i32;
    assert!((travel_ticks - expected).abs() <= 1, "{travel_ticks} ticks");

    // Cooldown has not started during the recovery pause.
    while c.state().follower(follower).unwrap().maneuver().is_some() {
        assert_relative_eq!(
            c.state().follower(follower).unwrap().cooldowns.dash_ready_at,
            0.0
        );
        c.tick(STEP).unwrap();
    }
    let finished_at = c.now();
    let agent = c.state().follower(follower).unwrap();
    assert_eq!(agent.state(), FollowerState::Following);
    assert_relative_eq!(
        agent.cooldowns.dash_ready_at,
        finished_at + tuning.dash_cooldown,
        epsilon = 1e-4
    );
    let total = tuning.dash_distance / tuning.dash_speed + tuning.dash_return_delay;
    assert!((finished_at - started_at - total).abs() <= 2.0 * STEP);

    // A dash requested during the cooldown is dropped.
    assert_eq!(
        c.broadcast_dash(leader, Vec3::FORWARD).unwrap(),
        BroadcastReport {
            addressed: 1,
            accepted: 0
        }
    );
    assert_eq!(
        c.state().follower(follower).unwrap().state(),
        FollowerState::Following
    );
}

#[test]
fn active_dash_blocks_quick_turn_and_shield() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 3);
    assert_eq!(c.broadcast_dash(leader, Vec3::FORWARD).unwrap().accepted, 3);

    let turn = c
        .broadcast_quick_turn(leader, Vec3::ZERO, Vec3::FORWARD, true)
        .unwrap();
    assert_eq!(turn.addressed, 3);
    assert_eq!(turn.accepted, 0);

    let shield = c.start_shield(leader, Vec3::ZERO, Vec3::FORWARD).unwrap();
    assert_eq!(shield.accepted, 0);

    for id in &members {
        let follower = c.state().follower(*id).unwrap();
        assert_eq!(follower.state(), FollowerState::Dashing);
        assert!(matches!(follower.maneuver(), Some(Maneuver::Dash(_))));
    }
}

#[test]
fn quick_turn_cooldown_gates_the_next_turn() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 1);
    let follower = members[0];
    let cooldown = c.config().maneuvers.quick_turn_cooldown;

    let turn = |c: &mut HerdCoordinator<'_>| {
        c.broadcast_quick_turn(leader, Vec3::ZERO, Vec3::FORWARD, true)
            .unwrap()
            .accepted
    };
    assert_eq!(turn(&mut c), 1);
    let mut ticks = 0;
    while c.state().follower(follower).unwrap().maneuver().is_some() {
        c.tick(STEP).unwrap();
        ticks += 1;
        assert!(ticks < 120);
    }
    let ready_at = c.state().follower(follower).unwrap().cooldowns.quick_turn_ready_at;
    assert_relative_eq!(ready_at, c.now() + cooldown, epsilon = 1e-4);

    assert_eq!(turn(&mut c), 0);
    while c.now() < ready_at {
        c.tick(STEP).unwrap();
    }
    assert_eq!(turn(&mut c), 1);
    assert_eq!(
        c.state().follower(follower).unwrap().state(),
        FollowerState::QuickTurning
    );
}

#[test]
fn dash_broadcast_reaches_everyone_but_members_gate_themselves() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (leader, members) = leader_with_members(&mut c, 3);

    assert_eq!(
        c.broadcast_dash(leader, Vec3::FORWARD).unwrap(),
        BroadcastReport {
            addressed: 3,
            accepted: 3
        }
    );
    // Mid-dash: addressed again, nobody accepts.
    assert_eq!(
        c.broadcast_dash(leader, Vec3::FORWARD).unwrap(),
        BroadcastReport {
            addressed: 3,
            accepted: 0
        }
    );
    for id in &members {
        assert_eq!(
            c.state().follower(*id).unwrap().state(),
            FollowerState::Dashing
        );
    }
}

#[test]
fn quick_turn_lands_members_ahead_of_the_pivot() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let leader = c.add_leader(LeaderKind::Player, Vec3::ZERO, 0.0).unwrap();
    let follower = c.add_follower(Vec3::new(0.0, 0.0, -3.0), 0.0).unwrap();
    c.join(follower, leader).unwrap();

    let report = c
        .broadcast_quick_turn(leader, Vec3::ZERO, Vec3::FORWARD, true)
        .unwrap();
    assert_eq!(report.accepted, 1);

    let mut ticks = 0;
    loop {
        let report = c.tick(STEP).unwrap();
        ticks += 1;
        if !report.completed_maneuvers.is_empty() {
            assert_eq!(
                report.completed_maneuvers,
                vec![(follower, ManeuverKind::QuickTurn)]
            );
            break;
        }
        assert!(ticks < 120);
    }
    let position = c.state().follower(follower).unwrap().position();
    assert_relative_eq!(position.x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(position.z, 8.0, epsilon = 1e-3);
}

#[test]
fn tick_requires_oracles_and_a_positive_step() {
    let mut state = HerdState::default();
    let config = crate::HerdConfig::default();
    let mut c = HerdCoordinator::new(&mut state, &config, Env::empty());
    assert_eq!(
        c.tick(STEP),
        Err(CoordinatorError::Oracle(crate::OracleError::GroundNotAvailable))
    );

    let ground = FlatGround::new(0.0);
    let rng = PcgRng;
    let effects = crate::NullEffects;
    let env = Env::with_all(&ground, &rng, &effects).into_herd_env();
    let mut c = HerdCoordinator::new(&mut state, &config, env);
    assert!(matches!(c.tick(0.0), Err(CoordinatorError::InvalidStep(_))));
    assert_eq!(c.state().clock.frame, 0);
}

#[test]
fn recruitment_scan_is_rate_limited() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let rival = c
        .add_leader(
            LeaderKind::autonomous_at(Vec3::ZERO),
            Vec3::ZERO,
            0.0,
        )
        .unwrap();
    let close = c.add_follower(Vec3::new(4.5, 0.0, 0.0), 0.0).unwrap();

    assert_eq!(c.recruit_nearby(rival).unwrap(), vec![close]);

    let second = c.add_follower(Vec3::new(-4.5, 0.0, 0.0), 0.0).unwrap();
    assert!(c.recruit_nearby(rival).unwrap().is_empty());

    c.state.clock.now += c.config().leader.recruitment_interval;
    assert_eq!(c.recruit_nearby(rival).unwrap(), vec![second]);
}

#[test]
fn standings_rank_rival_herds() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let (player, _) = leader_with_members(&mut c, 2);
    let mut rivals = Vec::new();
    for size in [1usize, 4, 3, 0] {
        let rival = c
            .add_leader(LeaderKind::autonomous_at(Vec3::ZERO), Vec3::ZERO, 0.0)
            .unwrap();
        for _ in 0..size {
            let follower = c.add_follower(Vec3::ZERO, 0.0).unwrap();
            c.join(follower, rival).unwrap();
        }
        rivals.push(rival);
    }

    let standings = c.standings(3);
    assert_eq!(
        standings.player,
        Some(HerdStanding {
            leader: player,
            size: 2
        })
    );
    let sizes: Vec<(LeaderId, usize)> = standings
        .rivals
        .iter()
        .map(|standing| (standing.leader, standing.size))
        .collect();
    assert_eq!(sizes, vec![(rivals[1], 4), (rivals[2], 3), (rivals[0], 1)]);
}

#[test]
fn roam_plans_only_apply_to_autonomous_leaders() {
    let mut fx = Fixture::new();
    let mut c = fx.coordinator();
    let player = c.add_leader(LeaderKind::Player, Vec3::ZERO, 0.0).unwrap();
    let rival = c
        .add_leader(LeaderKind::autonomous_at(Vec3::ZERO), Vec3::ZERO, 0.0)
        .unwrap();
    let plan = crate::RoamPlan {
        anchor: Vec3::ZERO,
        target: Vec3::new(3.0, 0.0, 4.0),
        next_pick_at: 5.0,
    };

    assert!(!c.set_roam_plan(player, plan).unwrap());
    assert!(c.set_roam_plan(rival, plan).unwrap());
    assert_eq!(c.leader(rival).unwrap().roam_plan(), Some(&plan));
}
