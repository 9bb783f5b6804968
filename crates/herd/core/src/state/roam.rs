use crate::math::Vec3;

/// Wandering state shared by roaming followers and autonomous leaders.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoamPlan {
    /// Centre of the wander disc.
    pub anchor: Vec3,
    /// Current waypoint.
    pub target: Vec3,
    /// Sim time at which a new waypoint is drawn.
    pub next_pick_at: f32,
}

impl RoamPlan {
    /// Plan that stays put and picks a waypoint on the first opportunity.
    pub const fn anchored_at(anchor: Vec3) -> Self {
        Self {
            anchor,
            target: anchor,
            next_pick_at: 0.0,
        }
    }

    #[inline]
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.next_pick_at
    }
}
