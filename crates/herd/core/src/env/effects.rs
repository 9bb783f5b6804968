//! Fire-and-forget notifications for presentation layers.
//!
//! The simulation never waits on an effect; sinks record or forward them and
//! return immediately.

use std::cell::RefCell;

use crate::math::Vec3;
use crate::state::{FollowerId, JoinOrder, LeaderId};

/// Something a presentation layer may want to play a sound or particle for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// A follower attached to a leader.
    Joined {
        follower: FollowerId,
        leader: LeaderId,
        join_order: JoinOrder,
    },
    /// A leader was knocked out by an impact.
    Disrupted { leader: LeaderId, position: Vec3 },
    /// A follower was removed from the world.
    Despawned { follower: FollowerId, position: Vec3 },
}

/// Receiver for [`Effect`]s.
pub trait EffectSink {
    fn emit(&self, effect: Effect);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn emit(&self, _effect: Effect) {}
}

/// Sink that keeps every effect in order. Useful in tests and replays.
#[derive(Debug, Default)]
pub struct EffectLog {
    entries: RefCell<Vec<Effect>>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Effect> {
        self.entries.take()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl EffectSink for EffectLog {
    fn emit(&self, effect: Effect) {
        self.entries.borrow_mut().push(effect);
    }
}
