//! The autonomous leader tree.
//!
//! ```text
//! Selector
//! ├── Sequence: incapacitated → hold position
//! └── Sequence
//!     ├── AlwaysSucceed(Sequence: roam due → pick waypoint)
//!     ├── Selector
//!     │   ├── Sequence: arrived → hold position
//!     │   └── walk to waypoint
//!     └── AlwaysSucceed(Sequence: recruit due → request scan)
//! ```

use behavior_tree::builder::{always_succeed, condition, node, selector, sequence};
use behavior_tree::{Behavior, BehaviorTree, Status};

use super::LeaderBlackboard;
use super::nodes::{
    HasArrived, HoldPosition, IsRecruitDue, IsRoamDue, PickRoamTarget, RequestRecruit,
    WalkToTarget,
};

/// Knocked-out leaders stand still and do nothing else.
pub fn recover_in_place() -> BehaviorTree<LeaderBlackboard> {
    sequence(vec![
        condition(|ctx: &LeaderBlackboard| ctx.incapacitated),
        node(HoldPosition),
    ])
}

/// Wanders between random waypoints around the anchor.
pub fn wander() -> BehaviorTree<LeaderBlackboard> {
    sequence(vec![
        always_succeed(sequence(vec![node(IsRoamDue), node(PickRoamTarget)])),
        selector(vec![
            sequence(vec![node(HasArrived), node(HoldPosition)]),
            node(WalkToTarget),
        ]),
    ])
}

/// Periodically pulls nearby free followers into the herd.
pub fn recruit() -> BehaviorTree<LeaderBlackboard> {
    always_succeed(sequence(vec![node(IsRecruitDue), node(RequestRecruit)]))
}

pub fn leader_tree() -> BehaviorTree<LeaderBlackboard> {
    selector(vec![recover_in_place(), sequence(vec![wander(), recruit()])])
}

/// Owned root of the leader tree.
pub struct LeaderTree {
    root: BehaviorTree<LeaderBlackboard>,
}

impl LeaderTree {
    pub fn new(root: BehaviorTree<LeaderBlackboard>) -> Self {
        Self { root }
    }

    pub fn evaluate(&self, ctx: &mut LeaderBlackboard) -> Status {
        self.root.tick(ctx)
    }
}

impl Default for LeaderTree {
    fn default() -> Self {
        Self::new(leader_tree())
    }
}
