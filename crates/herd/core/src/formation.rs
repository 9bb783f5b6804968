//! Ring formation geometry.
//!
//! Slots are laid out relative to a reference forward captured once when the
//! formation starts. Members keep their angular order around the pivot, so
//! nobody has to cross the ring to reach their slot.

use crate::math::{Vec3, signed_angle_y};
use crate::state::FollowerId;

/// Reference forward below this squared horizontal length falls back to `+Z`.
const DEGENERATE_FORWARD_SQ: f32 = 0.001;

/// One member's place on the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotAssignment {
    pub follower: FollowerId,
    /// Degrees from the reference forward.
    pub angle: f32,
    pub target: Vec3,
}

/// Evenly spaced slots on a ring of fixed radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationSolver {
    pub radius: f32,
}

impl FormationSolver {
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Flattens `forward` onto the ground plane and normalizes it.
    pub fn reference_forward(forward: Vec3) -> Vec3 {
        let flat = forward.horizontal();
        if flat.length_squared() < DEGENERATE_FORWARD_SQ {
            Vec3::FORWARD
        } else {
            flat.normalize()
        }
    }

    /// Sorts members by their signed angle around `pivot`, ascending.
    ///
    /// Ties are broken by id so the order is fully deterministic.
    pub fn order_members(
        pivot: Vec3,
        reference_forward: Vec3,
        members: &[(FollowerId, Vec3)],
    ) -> Vec<FollowerId> {
        let mut keyed: Vec<(f32, FollowerId)> = members
            .iter()
            .map(|(id, position)| (signed_angle_y(reference_forward, *position - pivot), *id))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Angle of slot `index` out of `count`, offset half a slot from forward.
    pub fn slot_angle(index: usize, count: usize) -> f32 {
        let step = 360.0 / count as f32;
        -180.0 + index as f32 * step + step / 2.0
    }

    /// Lays out `order` on the ring around `pivot`.
    pub fn assign(
        &self,
        pivot: Vec3,
        reference_forward: Vec3,
        order: &[FollowerId],
    ) -> Vec<SlotAssignment> {
        let count = order.len();
        order
            .iter()
            .enumerate()
            .map(|(index, follower)| {
                let angle = Self::slot_angle(index, count);
                let target = pivot + reference_forward.rotate_y(angle) * self.radius;
                SlotAssignment {
                    follower: *follower,
                    angle,
                    target,
                }
            })
            .collect()
    }

    /// Orders `members` and lays them out in one call.
    pub fn solve(
        &self,
        pivot: Vec3,
        reference_forward: Vec3,
        members: &[(FollowerId, Vec3)],
    ) -> Vec<SlotAssignment> {
        let order = Self::order_members(pivot, reference_forward, members);
        self.assign(pivot, reference_forward, &order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn four_members_get_quarter_slots() {
        let solver = FormationSolver::new(3.0);
        let members = [
            (FollowerId(1), Vec3::new(-1.0, 0.0, -1.0)),
            (FollowerId(2), Vec3::new(1.0, 0.0, -1.0)),
            (FollowerId(3), Vec3::new(1.0, 0.0, 1.0)),
            (FollowerId(4), Vec3::new(-1.0, 0.0, 1.0)),
        ];
        let slots = solver.solve(Vec3::ZERO, Vec3::FORWARD, &members);

        let angles: Vec<f32> = slots.iter().map(|slot| slot.angle).collect();
        assert_eq!(angles, vec![-135.0, -45.0, 45.0, 135.0]);
        for slot in &slots {
            assert_relative_eq!(slot.target.length(), 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn members_keep_their_angular_order() {
        let solver = FormationSolver::new(3.0);
        // Signed angles: id 1 at +90, id 2 at -90, id 3 at 180.
        let members = [
            (FollowerId(1), Vec3::new(2.0, 0.0, 0.0)),
            (FollowerId(2), Vec3::new(-2.0, 0.0, 0.0)),
            (FollowerId(3), Vec3::new(0.0, 0.0, -2.0)),
        ];
        let order = FormationSolver::order_members(Vec3::ZERO, Vec3::FORWARD, &members);
        assert_eq!(order, vec![FollowerId(2), FollowerId(1), FollowerId(3)]);

        let slots = solver.assign(Vec3::ZERO, Vec3::FORWARD, &order);
        // Id 2 started on the left and keeps a slot on the left.
        assert!(slots[0].target.x < 0.0);
        assert_relative_eq!(slots[0].angle, -120.0);
    }

    #[test]
    fn degenerate_forward_falls_back_to_plus_z() {
        assert_eq!(
            FormationSolver::reference_forward(Vec3::new(0.0, 5.0, 0.01)),
            Vec3::FORWARD
        );
        let tilted = FormationSolver::reference_forward(Vec3::new(3.0, 2.0, 0.0));
        assert_relative_eq!(tilted.x, 1.0);
        assert_relative_eq!(tilted.y, 0.0);
    }

    #[test]
    fn empty_roster_has_no_slots() {
        let solver = FormationSolver::new(3.0);
        assert!(solver.solve(Vec3::ZERO, Vec3::FORWARD, &[]).is_empty());
    }
}
