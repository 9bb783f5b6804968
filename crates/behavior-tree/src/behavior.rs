//! Core behavior trait.

use crate::Status;

/// A node evaluated against a blackboard context `C`.
///
/// Nodes are `Send + Sync` so a built tree can be stored in long-lived
/// runtime structures and shared between agents.
pub trait Behavior<C>: Send + Sync {
    /// Evaluates the node for the current frame.
    ///
    /// Nodes may read the context and write their decisions into it.
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Root of a tree, or any boxed subtree.
pub type BehaviorTree<C> = Box<dyn Behavior<C>>;

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
