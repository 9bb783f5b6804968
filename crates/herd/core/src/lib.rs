//! Deterministic herd simulation.
//!
//! `herd-core` models followers that attach to competing leaders, move in
//! formation behind them, execute leader-issued maneuvers (dash, quick-turn,
//! shield ring), and get scattered or stolen when their leader is hit. It is
//! tick-driven and performs no I/O: terrain, randomness, and presentation are
//! reached through the oracles in [`env`]. All state mutation flows through
//! [`HerdCoordinator`].
pub mod config;
pub mod coordinator;
pub mod disruption;
pub mod env;
pub mod error;
pub mod follower;
pub mod formation;
pub mod leader;
pub mod math;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{
    ConfigError, DisruptionTuning, FollowerTuning, HerdConfig, LeaderTuning, ManeuverTuning,
};
pub use coordinator::{
    BroadcastReport, CoordinatorError, HerdCoordinator, HerdStanding, JoinOutcome, Standings,
    TickReport,
};
pub use disruption::{
    DisruptionHandler, HitOutcome, IgnoredImpact, ImpactOutcome, StealOutcome,
};
pub use env::{
    Effect, EffectLog, EffectSink, Env, FlatGround, GroundOracle, GroundSample, HerdEnv,
    NullEffects, OracleError, PcgRng, PlaneGround, RngOracle,
};
pub use error::{ErrorSeverity, HerdError};
pub use follower::{Follower, FollowerState, Maneuver, ManeuverKind};
pub use formation::{FormationSolver, SlotAssignment};
pub use leader::{Leader, LeaderCapability, LeaderKind, Roster, ShieldHold};
pub use math::Vec3;
pub use state::{
    FollowerId, HerdState, JoinOrder, LeaderId, RoamPlan, SimClock, StateError,
};
