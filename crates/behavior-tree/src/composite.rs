//! Composite nodes: [`Sequence`] (AND) and [`Selector`] (OR).

use crate::{Behavior, BehaviorTree, Status};

/// Runs children left to right until one fails.
///
/// Succeeds only if every child succeeds. Children after the first failure
/// are not evaluated this frame.
pub struct Sequence<C> {
    children: Vec<BehaviorTree<C>>,
}

impl<C> Sequence<C> {
    /// # Panics
    ///
    /// Panics if `children` is empty; an empty sequence is a construction bug.
    pub fn new(children: Vec<BehaviorTree<C>>) -> Self {
        assert!(!children.is_empty(), "Sequence must have at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Runs children left to right until one succeeds.
///
/// Fails only if every child fails. Earlier children take priority.
pub struct Selector<C> {
    children: Vec<BehaviorTree<C>>,
}

impl<C> Selector<C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<BehaviorTree<C>>) -> Self {
        assert!(!children.is_empty(), "Selector must have at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}
