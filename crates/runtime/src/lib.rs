//! Runtime orchestration for the herd simulation.
//!
//! This crate wires `herd-core` to a host: it owns the world oracles, slices
//! host frames into fixed simulation steps, steers autonomous leaders with a
//! behavior tree, and republishes everything observable on a topic-based
//! event bus. Consumers embed [`Runtime`] and drive it from their own loop.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`events`] provides the topic-based event bus
//! - [`providers`] holds the autonomous leader brain
//! - [`session`] tracks the time limit and final standings
//! - [`config`] and [`logging`] cover host setup
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod logging;
pub mod providers;
pub mod runtime;
pub mod session;

pub use config::{EventConfig, RuntimeConfig, SessionConfig, SimulationConfig};
pub use effects::BusEffectSink;
pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, HerdEvent, PresentationEvent, SessionEvent, Topic};
pub use logging::LoggingConfig;
pub use providers::leader_ai::{LeaderBrain, LeaderDecision, LeaderTree};
pub use runtime::{FrameReport, Runtime, RuntimeBuilder};
pub use session::{Session, SessionOutcome};
