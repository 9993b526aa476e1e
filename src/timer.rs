//! Delayed and periodic tasks driven by the host clock.
//!
//! Nothing here sleeps or spawns threads. The host pumps time in with
//! `now` values (milliseconds since start, see [`Time::now_ms`]) and the
//! queues hand back whatever became due, in due order.
//!
//! [`Time::now_ms`]: crate::time::Time::now_ms

use std::collections::{BTreeMap, HashMap};

/// Milliseconds on the host clock.
pub type Millis = f64;

/// Handle to a scheduled one-shot task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// One-shot tasks keyed by due time, cancellable by id.
///
/// Tasks due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    /// `(due in microseconds, id)` -> task
    pending: BTreeMap<(u64, u64), T>,
    /// id -> due in microseconds
    due_by_id: HashMap<u64, u64>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Schedule `task` to fire at `due`.
    pub fn schedule(&mut self, due: Millis, task: T) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let key = to_micros(due);
        self.pending.insert((key, id), task);
        self.due_by_id.insert(id, key);
        TaskId(id)
    }

    /// Cancel a pending task. Returns the task if it had not fired yet;
    /// cancelling a fired or already-cancelled task returns `None`.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let key = self.due_by_id.remove(&id.0)?;
        self.pending.remove(&(key, id.0))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending
            .keys()
            .next()
            .map(|(micros, _)| *micros as Millis / 1000.0)
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TaskId, T)> {
        let limit = to_micros(now);
        let (&(key, id), _) = self.pending.iter().next()?;
        if key > limit {
            return None;
        }
        self.due_by_id.remove(&id);
        self.pending.remove(&(key, id)).map(|task| (TaskId(id), task))
    }

    /// Remove and return every task due at or before `now`, in due order.
    pub fn drain_due(&mut self, now: Millis) -> Vec<(TaskId, T)> {
        let mut fired = Vec::new();
        while let Some(entry) = self.pop_due(now) {
            fired.push(entry);
        }
        fired
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-period repeating timer.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Millis,
    next_due: Millis,
}

impl Interval {
    /// First firing happens one `period` after `start`.
    pub fn new(period: Millis, start: Millis) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    /// When the next firing is due, or `None` for a zero period.
    pub fn next_due(&self) -> Option<Millis> {
        (self.period > 0.0).then_some(self.next_due)
    }

    /// Return the firing times that elapsed up to `now`, advancing past them.
    ///
    /// A host that stalls for several periods gets every missed firing, the
    /// same as a platform interval timer catching up.
    pub fn elapsed(&mut self, now: Millis) -> Vec<Millis> {
        let mut fired = Vec::new();
        if self.period <= 0.0 {
            return fired;
        }
        while self.next_due <= now {
            fired.push(self.next_due);
            self.next_due += self.period;
        }
        fired
    }
}

fn to_micros(ms: Millis) -> u64 {
    (ms.max(0.0) * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(300.0, "c");
        q.schedule(100.0, "a");
        q.schedule(200.0, "b");

        assert!(q.pop_due(50.0).is_none());
        let fired: Vec<_> = q.drain_due(250.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(300.0));
    }

    #[test]
    fn test_same_instant_keeps_schedule_order() {
        let mut q = TimerQueue::new();
        for i in 0..5 {
            q.schedule(10.0, i);
        }
        let fired: Vec<_> = q.drain_due(10.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10.0, ());
        assert_eq!(q.cancel(id), Some(()));
        assert_eq!(q.cancel(id), None);
        assert!(q.is_empty());
        assert_eq!(q.next_due(), None);
        assert!(q.drain_due(100.0).is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10.0, 1);
        assert_eq!(q.pop_due(10.0).map(|(i, t)| (i, t)), Some((id, 1)));
        assert_eq!(q.cancel(id), None);
    }

    #[test]
    fn test_interval_catches_up() {
        let mut interval = Interval::new(200.0, 0.0);
        assert!(interval.elapsed(199.0).is_empty());
        assert_eq!(interval.elapsed(200.0), vec![200.0]);
        assert_eq!(interval.elapsed(850.0), vec![400.0, 600.0, 800.0]);
        assert_eq!(interval.next_due(), Some(1_000.0));
    }

    #[test]
    fn test_interval_zero_period_never_fires() {
        let mut interval = Interval::new(0.0, 0.0);
        assert!(interval.elapsed(1_000.0).is_empty());
        assert_eq!(interval.next_due(), None);
    }
}
