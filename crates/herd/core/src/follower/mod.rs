//! Per-follower state machine.
//!
//! A follower roams until it comes close to a leader that accepts recruits,
//! then follows that leader and executes the maneuvers it broadcasts. The
//! observable [`FollowerState`] is derived from the follower's fields rather
//! than stored, so the state can never disagree with the data behind it.
mod maneuver;
mod motion;

pub(crate) use motion::StepContext;
pub use maneuver::{
    DashPhase, DashRoutine, Maneuver, ManeuverKind, Progress, QuickTurnRoutine, ShieldRoutine,
};

use tracing::trace;

use crate::config::{FollowerTuning, ManeuverTuning};
use crate::math::Vec3;
use crate::state::{FollowerId, JoinOrder, LeaderId, RoamPlan};

/// Observable state of a follower.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowerState {
    Roaming,
    Following,
    Dashing,
    QuickTurning,
    Shielding,
}

/// Physical pose of an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub position: Vec3,
    /// Yaw in degrees.
    pub heading: f32,
    pub vertical_speed: f32,
    pub grounded: bool,
}

/// Link from a follower to the leader whose roster holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Membership {
    pub leader: LeaderId,
    pub order: JoinOrder,
}

/// Sim times at which each maneuver may start again.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    pub dash_ready_at: f32,
    pub quick_turn_ready_at: f32,
    pub shield_ready_at: f32,
}

impl Cooldowns {
    pub fn ready_at(&self, kind: ManeuverKind) -> f32 {
        match kind {
            ManeuverKind::Dash => self.dash_ready_at,
            ManeuverKind::QuickTurn => self.quick_turn_ready_at,
            ManeuverKind::Shield => self.shield_ready_at,
        }
    }

    fn start(&mut self, kind: ManeuverKind, now: f32, tuning: &ManeuverTuning) {
        match kind {
            ManeuverKind::Dash => self.dash_ready_at = now + tuning.dash_cooldown,
            ManeuverKind::QuickTurn => {
                self.quick_turn_ready_at = now + tuning.quick_turn_cooldown
            }
            ManeuverKind::Shield => self.shield_ready_at = now + tuning.shield_cooldown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Follower {
    pub id: FollowerId,
    pub body: Body,
    /// Smoothed horizontal velocity while following.
    pub move_velocity: Vec3,
    /// Internal rate of the velocity smoothing spring.
    damp_velocity: Vec3,
    pub roam: RoamPlan,
    pub cooldowns: Cooldowns,
    membership: Option<Membership>,
    flee_until: Option<f32>,
    next_join_scan_at: f32,
    last_signal_applied: Option<f32>,
    maneuver: Option<Maneuver>,
}

impl Follower {
    pub fn new(id: FollowerId, position: Vec3, heading: f32) -> Self {
        Self {
            id,
            body: Body {
                position,
                heading,
                vertical_speed: 0.0,
                grounded: true,
            },
            move_velocity: Vec3::ZERO,
            damp_velocity: Vec3::ZERO,
            roam: RoamPlan::anchored_at(position),
            cooldowns: Cooldowns::default(),
            membership: None,
            flee_until: None,
            next_join_scan_at: 0.0,
            last_signal_applied: None,
            maneuver: None,
        }
    }

    pub fn state(&self) -> FollowerState {
        match (&self.membership, &self.maneuver) {
            (None, _) => FollowerState::Roaming,
            (Some(_), None) => FollowerState::Following,
            (Some(_), Some(Maneuver::Dash(_))) => FollowerState::Dashing,
            (Some(_), Some(Maneuver::QuickTurn(_))) => FollowerState::QuickTurning,
            (Some(_), Some(Maneuver::Shield(_))) => FollowerState::Shielding,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn membership(&self) -> Option<Membership> {
        self.membership
    }

    pub fn leader(&self) -> Option<LeaderId> {
        self.membership.map(|m| m.leader)
    }

    pub fn join_order(&self) -> Option<JoinOrder> {
        self.membership.map(|m| m.order)
    }

    pub fn maneuver(&self) -> Option<&Maneuver> {
        self.maneuver.as_ref()
    }

    pub fn is_fleeing(&self, now: f32) -> bool {
        self.flee_until.is_some_and(|until| now < until)
    }

    pub fn last_signal_applied(&self) -> Option<f32> {
        self.last_signal_applied
    }

    /// Whether a proximity scan for leaders is due.
    pub fn wants_leader_scan(&self, now: f32) -> bool {
        self.membership.is_none() && !self.is_fleeing(now) && now >= self.next_join_scan_at
    }

    pub(crate) fn schedule_leader_scan(&mut self, now: f32, interval: f32) {
        self.next_join_scan_at = now + interval;
    }

    // ===== transitions =====

    /// Enters Following under `leader`.
    ///
    /// Signals the leader made before this moment are not mimicked.
    pub(crate) fn attach(&mut self, leader: LeaderId, order: JoinOrder, now: f32) {
        self.membership = Some(Membership { leader, order });
        self.flee_until = None;
        self.maneuver = None;
        self.last_signal_applied = Some(now);
        self.move_velocity = Vec3::ZERO;
        self.damp_velocity = Vec3::ZERO;
    }

    /// Drops back to Roaming around the current position.
    ///
    /// With `flee_direction`, the follower first runs `flee_distance` along it
    /// for `flee_duration` seconds before drawing random waypoints again.
    pub(crate) fn detach(
        &mut self,
        now: f32,
        flee_direction: Option<Vec3>,
        follower_tuning: &FollowerTuning,
        maneuver_tuning: &ManeuverTuning,
    ) {
        self.cancel_maneuver(now, maneuver_tuning);
        self.membership = None;
        self.move_velocity = Vec3::ZERO;
        self.damp_velocity = Vec3::ZERO;
        self.roam.anchor = self.body.position;

        match flee_direction {
            Some(direction) => {
                let until = now + follower_tuning.flee_duration;
                let away = direction.horizontal().normalize();
                self.roam.target = self.body.position + away * follower_tuning.flee_distance;
                self.roam.next_pick_at = until;
                self.flee_until = Some(until);
                self.next_join_scan_at = until;
            }
            None => {
                self.roam.target = self.body.position;
                self.roam.next_pick_at = now;
                self.flee_until = None;
                self.next_join_scan_at = now;
            }
        }
    }

    /// Stops the active maneuver. Its cooldown starts now.
    pub(crate) fn cancel_maneuver(&mut self, now: f32, tuning: &ManeuverTuning) {
        if let Some(maneuver) = self.maneuver.take() {
            trace!(follower = %self.id, kind = %maneuver.kind(), "maneuver cancelled");
            self.cooldowns.start(maneuver.kind(), now, tuning);
        }
    }

    fn can_start(&self, kind: ManeuverKind, now: f32) -> bool {
        self.membership.is_some() && self.maneuver.is_none() && now >= self.cooldowns.ready_at(kind)
    }

    /// Starts a dash if the follower is idle-following and off cooldown.
    pub fn try_start_dash(&mut self, direction: Vec3, now: f32) -> bool {
        let direction = direction.horizontal().normalize();
        if direction == Vec3::ZERO || !self.can_start(ManeuverKind::Dash, now) {
            return false;
        }
        self.maneuver = Some(Maneuver::Dash(DashRoutine::new(direction)));
        true
    }

    /// Starts a quick-turn arc around `pivot` ending at `target`.
    pub fn try_start_quick_turn(
        &mut self,
        pivot: Vec3,
        target: Vec3,
        clockwise: bool,
        now: f32,
        tuning: &ManeuverTuning,
    ) -> bool {
        if !self.can_start(ManeuverKind::QuickTurn, now) {
            return false;
        }
        self.maneuver = Some(Maneuver::QuickTurn(QuickTurnRoutine::new(
            pivot,
            self.body.position,
            target,
            clockwise,
            tuning.quick_turn_duration,
        )));
        true
    }

    /// Assigns a shield slot. A follower already shielding is re-targeted.
    pub fn enter_shield(
        &mut self,
        slot: Vec3,
        pivot: Vec3,
        now: f32,
        tuning: &ManeuverTuning,
    ) -> bool {
        if let Some(Maneuver::Shield(shield)) = &mut self.maneuver {
            shield.retarget(slot, pivot, tuning.shield_arrive_distance);
            return true;
        }
        if !self.can_start(ManeuverKind::Shield, now) {
            return false;
        }
        self.maneuver = Some(Maneuver::Shield(ShieldRoutine::new(slot, pivot)));
        true
    }

    /// Leaves the shield ring. Returns false if the follower was not shielding.
    pub fn exit_shield(&mut self, now: f32, tuning: &ManeuverTuning) -> bool {
        if matches!(self.maneuver, Some(Maneuver::Shield(_))) {
            self.cancel_maneuver(now, tuning);
            true
        } else {
            false
        }
    }
}
