//! Narrow interfaces to the host world.
//!
//! The simulation never owns terrain, randomness, or presentation. It reaches
//! them through the oracles bundled in [`Env`], so the same core runs against
//! a real terrain, a flat test plane, or a recorded replay.
mod effects;
mod error;
mod ground;
mod rng;

pub use effects::{Effect, EffectLog, EffectSink, NullEffects};
pub use error::OracleError;
pub use ground::{FlatGround, GroundOracle, GroundSample, PlaneGround};
pub use rng::{PcgRng, RngOracle, compute_seed, roll};

/// Aggregates the oracles the coordinator consults while stepping.
///
/// Ground and rng are required for [`tick`](crate::HerdCoordinator::tick);
/// the effect sink is optional and effects are silently dropped without one.
pub struct Env<'a, G, R, E>
where
    G: GroundOracle + ?Sized,
    R: RngOracle + ?Sized,
    E: EffectSink + ?Sized,
{
    ground: Option<&'a G>,
    rng: Option<&'a R>,
    effects: Option<&'a E>,
}

impl<G, R, E> Clone for Env<'_, G, R, E>
where
    G: GroundOracle + ?Sized,
    R: RngOracle + ?Sized,
    E: EffectSink + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

// Manual impls: derive would demand `G: Copy`, which trait objects are not.
impl<G, R, E> Copy for Env<'_, G, R, E>
where
    G: GroundOracle + ?Sized,
    R: RngOracle + ?Sized,
    E: EffectSink + ?Sized,
{
}

pub type HerdEnv<'a> = Env<'a, dyn GroundOracle + 'a, dyn RngOracle + 'a, dyn EffectSink + 'a>;

impl<'a, G, R, E> Env<'a, G, R, E>
where
    G: GroundOracle + ?Sized,
    R: RngOracle + ?Sized,
    E: EffectSink + ?Sized,
{
    pub fn new(ground: Option<&'a G>, rng: Option<&'a R>, effects: Option<&'a E>) -> Self {
        Self {
            ground,
            rng,
            effects,
        }
    }

    pub fn with_all(ground: &'a G, rng: &'a R, effects: &'a E) -> Self {
        Self::new(Some(ground), Some(rng), Some(effects))
    }

    pub fn empty() -> Self {
        Self {
            ground: None,
            rng: None,
            effects: None,
        }
    }

    /// Returns the GroundOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::GroundNotAvailable` if no ground oracle was provided.
    pub fn ground(&self) -> Result<&'a G, OracleError> {
        self.ground.ok_or(OracleError::GroundNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Forwards an effect to the sink, if any.
    pub fn emit(&self, effect: Effect) {
        if let Some(effects) = self.effects {
            effects.emit(effect);
        }
    }
}

impl<'a, G, R, E> Env<'a, G, R, E>
where
    G: GroundOracle + 'a,
    R: RngOracle + 'a,
    E: EffectSink + 'a,
{
    /// Converts this environment into a trait-object based `HerdEnv`.
    pub fn into_herd_env(self) -> HerdEnv<'a> {
        self.as_herd_env()
    }

    /// Converts this environment into a trait-object based `HerdEnv` (borrows self).
    pub fn as_herd_env(&self) -> HerdEnv<'a> {
        let ground: Option<&'a dyn GroundOracle> = self.ground.map(|ground| ground as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        let effects: Option<&'a dyn EffectSink> = self.effects.map(|effects| effects as _);
        Env::new(ground, rng, effects)
    }
}
