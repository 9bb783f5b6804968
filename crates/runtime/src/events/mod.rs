//! Topic-based event bus for runtime events.
//!
//! Events are published to a topic and consumers subscribe only to the
//! topics they need. Publishing never blocks the simulation: an event with no
//! subscriber is dropped and a lagging subscriber skips ahead.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{HerdEvent, PresentationEvent, SessionEvent};
