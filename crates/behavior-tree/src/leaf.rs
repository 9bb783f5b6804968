//! Closure-backed leaf nodes.
//!
//! Most leaves are small unit structs implementing [`Behavior`] directly.
//! These adapters cover one-off checks and writes that do not deserve a
//! named type.

use std::marker::PhantomData;

use crate::{Behavior, Status};

/// Read-only predicate over the context.
pub struct Condition<C, F> {
    predicate: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        (self.predicate)(ctx).into()
    }
}

/// Closure that may write to the context.
pub struct Action<C, F> {
    run: F,
    _context: PhantomData<fn(&mut C)>,
}

impl<C, F> Action<C, F>
where
    F: Fn(&mut C) -> Status + Send + Sync,
{
    pub fn new(run: F) -> Self {
        Self {
            run,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Action<C, F>
where
    F: Fn(&mut C) -> Status + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        (self.run)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_reads_and_action_writes() {
        let ready = Condition::new(|count: &u32| *count >= 2);
        let bump = Action::new(|count: &mut u32| {
            *count += 1;
            Status::Success
        });

        let mut count = 0;
        assert_eq!(ready.tick(&mut count), Status::Failure);
        bump.tick(&mut count);
        bump.tick(&mut count);
        assert_eq!(ready.tick(&mut count), Status::Success);
    }
}
