//! Bridges core effects onto the event bus.

use std::cell::Cell;

use herd_core::{Effect, EffectSink};

use crate::events::{Event, EventBus, PresentationEvent};

/// Publishes every core [`Effect`] on the presentation topic.
///
/// The frame stamp is set by the runtime before each step.
#[derive(Debug)]
pub struct BusEffectSink {
    bus: EventBus,
    frame: Cell<u64>,
}

impl BusEffectSink {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            frame: Cell::new(0),
        }
    }

    pub fn set_frame(&self, frame: u64) {
        self.frame.set(frame);
    }
}

impl EffectSink for BusEffectSink {
    fn emit(&self, effect: Effect) {
        self.bus.publish(Event::Presentation(PresentationEvent {
            frame: self.frame.get(),
            effect,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use herd_core::{LeaderId, Vec3};

    #[test]
    fn effects_arrive_stamped_with_the_frame() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Presentation);
        let sink = BusEffectSink::new(bus);

        sink.set_frame(12);
        sink.emit(Effect::Disrupted {
            leader: LeaderId(3),
            position: Vec3::ZERO,
        });

        let Event::Presentation(event) = rx.try_recv().unwrap() else {
            panic!("wrong topic");
        };
        assert_eq!(event.frame, 12);
        assert!(matches!(event.effect, Effect::Disrupted { .. }));
    }
}
