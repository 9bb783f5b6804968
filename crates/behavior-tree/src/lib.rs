//! Stateless behavior trees evaluated once per simulation frame.
//!
//! A tree is re-evaluated from the root every frame against a blackboard
//! context. Nodes keep no memory between evaluations; anything that must
//! persist across frames (a waypoint, a timer) lives in the context the tree
//! reads and writes. That keeps evaluation deterministic and lets a tree be
//! shared between any number of agents.
//!
//! - [`Behavior`]: the node trait
//! - [`Status`]: Success or Failure
//! - Leaves: [`Condition`], [`Action`]
//! - Composites: [`Sequence`], [`Selector`]
//! - Decorators: [`Inverter`], [`AlwaysSucceed`]
//! - [`builder`]: boxed shorthands for assembling trees

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod status;

pub use behavior::{Behavior, BehaviorTree};
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Inverter};
pub use leaf::{Action, Condition};
pub use status::Status;
