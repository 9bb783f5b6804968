//! Blackboard shared by the nodes of the leader tree.

use herd_core::env::{compute_seed, roll};
use herd_core::{Leader, LeaderId, LeaderTuning, PcgRng, RoamPlan, Vec3};

/// Per-frame snapshot of one autonomous leader plus the plan being built.
///
/// Owned rather than borrowed so trees can be stored as `'static` values.
#[derive(Debug, Clone)]
pub struct LeaderBlackboard {
    pub leader: LeaderId,
    pub now: f32,
    pub dt: f32,
    pub seed: u64,
    pub frame: u64,

    pub position: Vec3,
    /// Yaw in degrees.
    pub heading: f32,
    pub roam: RoamPlan,
    pub incapacitated: bool,
    pub next_recruit_at: f32,
    pub tuning: LeaderTuning,

    rng: PcgRng,

    /// Output written by action nodes.
    pub plan: LeaderPlan,
}

/// What the tree decided for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderPlan {
    pub position: Vec3,
    pub heading: f32,
    pub velocity: Vec3,
    /// Replacement wander plan, when a new waypoint was drawn.
    pub roam: Option<RoamPlan>,
    /// Whether to run a recruitment scan.
    pub recruit: bool,
}

impl LeaderBlackboard {
    /// Snapshots `leader`. Returns `None` for leaders without a wander plan.
    pub fn snapshot(
        leader: &Leader,
        tuning: &LeaderTuning,
        now: f32,
        dt: f32,
        seed: u64,
        frame: u64,
    ) -> Option<Self> {
        let roam = *leader.roam_plan()?;
        Some(Self {
            leader: leader.id,
            now,
            dt,
            seed,
            frame,
            position: leader.position,
            heading: leader.heading,
            roam,
            incapacitated: leader.is_incapacitated(now),
            next_recruit_at: leader.next_recruit_at,
            tuning: tuning.clone(),
            rng: PcgRng,
            plan: LeaderPlan {
                position: leader.position,
                heading: leader.heading,
                velocity: Vec3::ZERO,
                roam: None,
                recruit: false,
            },
        })
    }

    /// Deterministic draw for this leader, frame, and purpose.
    pub fn roll_seed(&self, context: u32) -> u64 {
        compute_seed(
            self.seed,
            self.frame,
            self.leader.0 | roll::LEADER_SALT,
            context,
        )
    }

    pub fn rng(&self) -> &PcgRng {
        &self.rng
    }

    /// Waypoint currently being walked to, including one drawn this frame.
    pub fn current_target(&self) -> Vec3 {
        self.plan.roam.map_or(self.roam.target, |roam| roam.target)
    }
}
