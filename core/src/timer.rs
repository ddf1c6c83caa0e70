use core::time::Duration;
use std::collections::BTreeMap;

use crate::Position;

/// Handle of a scheduled task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Delayed follow-up the game has to run once its deadline passes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Turn back every tile shown by the start preview
    EndPreview,
    /// Turn back a mismatched pair and release the selection
    ResolveMismatch { first: Position, second: Position },
}

/// One-shot tasks ordered by deadline, ties run in scheduling order.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), Deferred>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Duration, action: Deferred) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), action);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|&(_, pending_id), _| pending_id != id);
        self.pending.len() != before
    }

    /// Drops every pending task, returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Removes and returns the earliest task whose deadline is not after `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Deferred)> {
        let (&(deadline, _), _) = self.pending.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.pending
            .pop_first()
            .map(|((_, id), action)| (id, action))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut timers = Timers::new();
        let mismatch = Deferred::ResolveMismatch {
            first: (0, 0),
            second: (0, 1),
        };
        timers.schedule(ms(3000), Deferred::EndPreview);
        timers.schedule(ms(1000), mismatch);

        assert_eq!(timers.pop_due(ms(500)), None);
        assert_eq!(timers.pop_due(ms(5000)).map(|(_, action)| action), Some(mismatch));
        assert_eq!(
            timers.pop_due(ms(5000)).map(|(_, action)| action),
            Some(Deferred::EndPreview)
        );
        assert!(timers.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut timers = Timers::new();
        let first = timers.schedule(ms(10), Deferred::EndPreview);
        let second = timers.schedule(ms(10), Deferred::EndPreview);

        assert_eq!(timers.pop_due(ms(10)).map(|(id, _)| id), Some(first));
        assert_eq!(timers.pop_due(ms(10)).map(|(id, _)| id), Some(second));
    }

    #[test]
    fn cancel_removes_only_that_task() {
        let mut timers = Timers::new();
        let keep = timers.schedule(ms(10), Deferred::EndPreview);
        let dropped = timers.schedule(ms(20), Deferred::EndPreview);

        assert!(timers.cancel(dropped));
        assert!(!timers.cancel(dropped));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(ms(10)));
        assert_eq!(timers.pop_due(ms(100)).map(|(id, _)| id), Some(keep));
    }

    #[test]
    fn cancel_all_empties_queue() {
        let mut timers = Timers::new();
        timers.schedule(ms(10), Deferred::EndPreview);
        timers.schedule(ms(20), Deferred::EndPreview);

        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.next_deadline(), None);
        assert_eq!(timers.pop_due(ms(100)), None);
    }
}
