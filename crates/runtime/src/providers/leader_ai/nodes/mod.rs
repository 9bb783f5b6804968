//! Leaf nodes of the leader tree.
//!
//! Conditions only read the blackboard. Actions write into
//! [`LeaderPlan`](super::LeaderPlan) and never touch the simulation directly.

pub mod actions;
pub mod conditions;

pub use actions::{HoldPosition, PickRoamTarget, RequestRecruit, WalkToTarget};
pub use conditions::{HasArrived, IsRecruitDue, IsRoamDue};
