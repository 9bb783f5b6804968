//! Behavior-tree AI for autonomous leaders.
//!
//! Each frame, every autonomous leader is evaluated once:
//!
//! 1. **Snapshot**: [`LeaderBlackboard`] copies what the tree needs from the
//!    leader and the session (pose, wander plan, timers, tunables)
//! 2. **Evaluate**: the tree from [`tree::leader_tree`] reads the snapshot and
//!    writes a [`LeaderPlan`] into it
//! 3. **Apply**: [`LeaderBrain`] pushes the plan back through the coordinator
//!    (pose, new waypoint, recruitment scan)
//!
//! The tree owns no state. Waypoints and timers live on the leader itself, so
//! the same tree drives every rival herd.

pub mod brain;
pub mod context;
pub mod nodes;
pub mod tree;

pub use brain::{LeaderBrain, LeaderDecision};
pub use context::{LeaderBlackboard, LeaderPlan};
pub use tree::LeaderTree;
