//! Single-child decorators.

use crate::{Behavior, BehaviorTree, Status};

/// Logical NOT of its child.
pub struct Inverter<C> {
    child: BehaviorTree<C>,
}

impl<C> Inverter<C> {
    pub fn new(child: BehaviorTree<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

/// Runs its child and succeeds regardless of the outcome.
///
/// Used for optional steps inside a [`Sequence`](crate::Sequence) that must
/// not cut the rest of the sequence short.
pub struct AlwaysSucceed<C> {
    child: BehaviorTree<C>,
}

impl<C> AlwaysSucceed<C> {
    pub fn new(child: BehaviorTree<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}
