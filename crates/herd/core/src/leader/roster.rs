use crate::state::{FollowerId, JoinOrder, StateError};

/// A member as recorded by its leader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    pub follower: FollowerId,
    pub order: JoinOrder,
}

/// Followers owned by one leader, kept in join order.
///
/// The join counter never rewinds, so an index handed out once is never
/// reused even after its holder leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    entries: Vec<RosterEntry>,
    next_order: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_order: JoinOrder::FIRST.0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, follower: FollowerId) -> bool {
        self.order_of(follower).is_some()
    }

    pub fn order_of(&self, follower: FollowerId) -> Option<JoinOrder> {
        self.entries
            .iter()
            .find(|entry| entry.follower == follower)
            .map(|entry| entry.order)
    }

    /// Entries from oldest to most recent.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn members(&self) -> impl Iterator<Item = FollowerId> + '_ {
        self.entries.iter().map(|entry| entry.follower)
    }

    /// Appends `follower` and returns its join order.
    ///
    /// Registering a current member again returns the order it already holds.
    ///
    /// # Errors
    ///
    /// Fails once the join counter is exhausted, rather than hand out an
    /// order twice.
    pub fn register(&mut self, follower: FollowerId) -> Result<JoinOrder, StateError> {
        if let Some(order) = self.order_of(follower) {
            return Ok(order);
        }
        let order = JoinOrder(self.next_order);
        self.next_order = self
            .next_order
            .checked_add(1)
            .ok_or(StateError::IdOverflow { kind: "join order" })?;
        self.entries.push(RosterEntry { follower, order });
        Ok(order)
    }

    /// Removes `follower`. Returns false if it was not a member.
    pub fn unregister(&mut self, follower: FollowerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.follower != follower);
        self.entries.len() != before
    }

    /// Removes up to `count` of the most recently joined members.
    ///
    /// The result is in removal order: the newest member comes first.
    pub fn pop_most_recent(&mut self, count: usize) -> Vec<FollowerId> {
        let count = count.min(self.entries.len());
        let mut removed = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(entry) = self.entries.pop() {
                removed.push(entry.follower);
            }
        }
        removed
    }

    /// Removes every member, oldest first.
    pub fn clear(&mut self) -> Vec<FollowerId> {
        self.entries.drain(..).map(|entry| entry.follower).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_orders_are_distinct_and_never_reused() {
        let mut roster = Roster::new();
        let a = roster.register(FollowerId(10)).unwrap();
        let b = roster.register(FollowerId(11)).unwrap();
        assert_eq!(a, JoinOrder(1));
        assert_eq!(b, JoinOrder(2));

        assert!(roster.unregister(FollowerId(10)));
        let c = roster.register(FollowerId(12)).unwrap();
        assert_eq!(c, JoinOrder(3));
    }

    #[test]
    fn registering_twice_keeps_the_first_order() {
        let mut roster = Roster::new();
        let first = roster.register(FollowerId(1)).unwrap();
        roster.register(FollowerId(2)).unwrap();
        assert_eq!(roster.register(FollowerId(1)).unwrap(), first);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut roster = Roster::new();
        roster.register(FollowerId(1)).unwrap();
        assert!(roster.unregister(FollowerId(1)));
        assert!(!roster.unregister(FollowerId(1)));
        assert!(roster.is_empty());
    }

    #[test]
    fn pop_most_recent_is_lifo_and_clamped() {
        let mut roster = Roster::new();
        for id in 1..=3 {
            roster.register(FollowerId(id)).unwrap();
        }
        let popped = roster.pop_most_recent(10);
        assert_eq!(popped, vec![FollowerId(3), FollowerId(2), FollowerId(1)]);
        assert!(roster.is_empty());
    }

    #[test]
    fn exhausted_join_counter_is_an_error() {
        let mut roster = Roster::new();
        roster.next_order = u32::MAX - 1;
        assert_eq!(roster.register(FollowerId(1)).unwrap(), JoinOrder(u32::MAX - 1));
        assert_eq!(
            roster.register(FollowerId(2)),
            Err(StateError::IdOverflow { kind: "join order" })
        );
        assert_eq!(roster.len(), 1);
        assert!(!roster.contains(FollowerId(2)));
    }
}
