/// Monotonic simulation clock.
///
/// Advances only through [`HerdCoordinator::tick`](crate::HerdCoordinator::tick),
/// so pausing the host pauses every timer in the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds since the session started.
    pub now: f32,
    /// Number of completed ticks.
    pub frame: u64,
}

impl SimClock {
    pub const fn new() -> Self {
        Self { now: 0.0, frame: 0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
        self.frame += 1;
    }
}
