//! Boxed shorthands so trees read top-down.
//!
//! ```
//! use behavior_tree::{Status, builder::*};
//!
//! let tree = selector(vec![
//!     sequence(vec![condition(|n: &u32| *n > 3), action(|n: &mut u32| {
//!         *n = 0;
//!         Status::Success
//!     })]),
//!     action(|n: &mut u32| {
//!         *n += 1;
//!         Status::Success
//!     }),
//! ]);
//!
//! let mut n = 4;
//! tree.tick(&mut n);
//! assert_eq!(n, 0);
//! ```

use crate::{
    Action, AlwaysSucceed, Behavior, BehaviorTree, Condition, Inverter, Selector, Sequence, Status,
};

#[inline]
pub fn sequence<C: 'static>(children: Vec<BehaviorTree<C>>) -> BehaviorTree<C> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<C: 'static>(children: Vec<BehaviorTree<C>>) -> BehaviorTree<C> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn inverter<C: 'static>(child: BehaviorTree<C>) -> BehaviorTree<C> {
    Box::new(Inverter::new(child))
}

#[inline]
pub fn always_succeed<C: 'static>(child: BehaviorTree<C>) -> BehaviorTree<C> {
    Box::new(AlwaysSucceed::new(child))
}

#[inline]
pub fn condition<C, F>(predicate: F) -> BehaviorTree<C>
where
    C: 'static,
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    Box::new(Condition::new(predicate))
}

#[inline]
pub fn action<C, F>(run: F) -> BehaviorTree<C>
where
    C: 'static,
    F: Fn(&mut C) -> Status + Send + Sync + 'static,
{
    Box::new(Action::new(run))
}

/// Boxes any node.
#[inline]
pub fn node<C, B>(behavior: B) -> BehaviorTree<C>
where
    B: Behavior<C> + 'static,
{
    Box::new(behavior)
}
