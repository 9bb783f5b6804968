//! Shared fixtures for unit tests.

use crate::config::HerdConfig;
use crate::coordinator::HerdCoordinator;
use crate::env::{EffectLog, Env, FlatGround, PcgRng};
use crate::state::HerdState;

pub const STEP: f32 = 1.0 / 60.0;

/// Owns everything a coordinator borrows.
pub struct Fixture {
    pub state: HerdState,
    pub config: HerdConfig,
    pub ground: FlatGround,
    pub rng: PcgRng,
    pub effects: EffectLog,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            state: HerdState::with_seed(0x5eed),
            config: HerdConfig::default(),
            ground: FlatGround::new(0.0),
            rng: PcgRng,
            effects: EffectLog::new(),
        }
    }

    pub fn coordinator(&mut self) -> HerdCoordinator<'_> {
        let env = Env::with_all(&self.ground, &self.rng, &self.effects).into_herd_env();
        HerdCoordinator::new(&mut self.state, &self.config, env)
    }
}
