//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{HerdEvent, PresentationEvent, SessionEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Fire-and-forget cues for audio and visuals (joins, impacts, despawns).
    Presentation,
    /// Herd bookkeeping: recruitment, maneuvers, disruption outcomes.
    Herd,
    /// Session lifecycle.
    Session,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Presentation, Topic::Herd, Topic::Session];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Presentation(PresentationEvent),
    Herd(HerdEvent),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Presentation(_) => Topic::Presentation,
            Event::Herd(_) => Topic::Herd,
            Event::Session(_) => Topic::Session,
        }
    }
}

#[derive(Debug)]
struct Channels {
    presentation: broadcast::Sender<Event>,
    herd: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
}

/// Topic-based event bus.
///
/// Cloning is cheap; clones share the same channels.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a bus buffering `capacity` events per topic.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                presentation: broadcast::channel(capacity).0,
                herd: broadcast::channel(capacity).0,
                session: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Presentation => &self.channels.presentation,
            Topic::Herd => &self.channels.herd,
            Topic::Session => &self.channels.session,
        }
    }

    /// Publishes an event to its topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(?topic, "no subscribers");
        }
    }

    /// Subscribes to one topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribes to several topics at once.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
