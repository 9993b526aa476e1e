//! Pointer trail marks.
//!
//! Every pointer move drops one short-lived mark. Marks live in two places:
//! the [`TrailLayer`] the host renders (the visual container) and the
//! emitter's FIFO queue that enforces the population cap. Removal is
//! idempotent in both, so an expiry that fires after an eviction is a no-op.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;
use tracing::trace;

use crate::timer::{Millis, TaskId, TimerQueue};

/// Identity of a trail mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(u64);

/// One transient trail mark.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailMark {
    pub id: MarkId,
    pub position: Vec2,
    /// Host time the mark was created.
    pub born: Millis,
}

impl TrailMark {
    /// Remaining visual strength, 1.0 at birth falling linearly to 0.0
    /// at `ttl`.
    pub fn fade(&self, now: Millis, ttl: Millis) -> f32 {
        if ttl <= 0.0 {
            return 0.0;
        }
        (1.0 - (now - self.born) / ttl).clamp(0.0, 1.0) as f32
    }
}

/// Visual container of live trail marks, oldest first.
#[derive(Debug, Default, Clone)]
pub struct TrailLayer {
    marks: Vec<TrailMark>,
}

impl TrailLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, mark: TrailMark) {
        self.marks.push(mark);
    }

    /// Detach a mark. Returns `false` if it was not attached.
    pub fn remove(&mut self, id: MarkId) -> bool {
        match self.marks.iter().position(|m| m.id == id) {
            Some(index) => {
                self.marks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: MarkId) -> bool {
        self.marks.iter().any(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailMark> {
        self.marks.iter()
    }
}

/// Spawns trail marks, expires them after a fixed time-to-live and evicts
/// the oldest when the live count exceeds the cap.
#[derive(Debug)]
pub struct TrailEmitter {
    next_id: u64,
    ttl: Millis,
    cap: usize,
    queue: VecDeque<MarkId>,
    removals: TimerQueue<MarkId>,
    scheduled: HashMap<MarkId, TaskId>,
}

impl TrailEmitter {
    pub fn new(ttl: Millis, cap: usize) -> Self {
        Self {
            next_id: 0,
            ttl,
            cap,
            queue: VecDeque::new(),
            removals: TimerQueue::new(),
            scheduled: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Millis {
        self.ttl
    }

    /// Live marks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `id` is still tracked by the queue.
    pub fn contains(&self, id: MarkId) -> bool {
        self.queue.contains(&id)
    }

    /// Drop a mark at `position`, schedule its removal and enforce the cap.
    pub fn spawn(&mut self, position: Vec2, now: Millis, layer: &mut TrailLayer) -> MarkId {
        let id = MarkId(self.next_id);
        self.next_id += 1;

        layer.append(TrailMark {
            id,
            position,
            born: now,
        });
        self.queue.push_back(id);
        let task = self.removals.schedule(now + self.ttl, id);
        self.scheduled.insert(id, task);

        while self.queue.len() > self.cap {
            let Some(oldest) = self.queue.pop_front() else {
                break;
            };
            layer.remove(oldest);
            if let Some(task) = self.scheduled.remove(&oldest) {
                self.removals.cancel(task);
            }
            trace!(mark = oldest.0, "evicted trail mark over cap");
        }

        id
    }

    /// Remove every mark whose time-to-live ran out by `now`.
    ///
    /// Returns how many marks were actually detached from the layer.
    pub fn expire(&mut self, now: Millis, layer: &mut TrailLayer) -> usize {
        let mut removed = 0;
        for (_, id) in self.removals.drain_due(now) {
            self.scheduled.remove(&id);
            if self.remove(id, layer) {
                removed += 1;
            }
        }
        removed
    }

    /// Detach `id` from the layer and the queue. Absent ids are ignored.
    pub fn remove(&mut self, id: MarkId, layer: &mut TrailLayer) -> bool {
        let detached = layer.remove(id);
        if let Some(index) = self.queue.iter().position(|queued| *queued == id) {
            self.queue.remove(index);
        }
        detached
    }

    /// Earliest pending expiry.
    pub fn next_expiry(&self) -> Option<Millis> {
        self.removals.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_appends_to_layer_and_queue() {
        let mut layer = TrailLayer::new();
        let mut emitter = TrailEmitter::new(500.0, 20);
        let id = emitter.spawn(Vec2::new(3.0, 4.0), 0.0, &mut layer);
        assert!(layer.contains(id));
        assert!(emitter.contains(id));
        assert_eq!(emitter.next_expiry(), Some(500.0));
    }

    #[test]
    fn test_expire_after_ttl() {
        let mut layer = TrailLayer::new();
        let mut emitter = TrailEmitter::new(500.0, 20);
        let a = emitter.spawn(Vec2::ZERO, 0.0, &mut layer);
        let b = emitter.spawn(Vec2::ZERO, 100.0, &mut layer);

        assert_eq!(emitter.expire(499.0, &mut layer), 0);
        assert_eq!(emitter.expire(500.0, &mut layer), 1);
        assert!(!layer.contains(a));
        assert!(layer.contains(b));
        assert_eq!(emitter.expire(600.0, &mut layer), 1);
        assert!(layer.is_empty());
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut layer = TrailLayer::new();
        let mut emitter = TrailEmitter::new(500.0, 20);
        let ids: Vec<_> = (0..25)
            .map(|i| emitter.spawn(Vec2::splat(i as f32), i as f64, &mut layer))
            .collect();

        assert_eq!(emitter.len(), 20);
        assert_eq!(layer.len(), 20);
        for id in &ids[..5] {
            assert!(!layer.contains(*id));
            assert!(!emitter.contains(*id));
        }
        for id in &ids[5..] {
            assert!(layer.contains(*id));
        }
    }

    #[test]
    fn test_expiry_of_evicted_mark_is_noop() {
        let mut layer = TrailLayer::new();
        let mut emitter = TrailEmitter::new(500.0, 2);
        let first = emitter.spawn(Vec2::ZERO, 0.0, &mut layer);
        emitter.spawn(Vec2::ZERO, 10.0, &mut layer);
        emitter.spawn(Vec2::ZERO, 20.0, &mut layer);
        assert!(!layer.contains(first));

        // Removing it again by hand is silent.
        assert!(!emitter.remove(first, &mut layer));

        // Past every ttl: only the two survivors are detached.
        assert_eq!(emitter.expire(10_000.0, &mut layer), 2);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_layer_remove_absent_is_false() {
        let mut layer = TrailLayer::new();
        assert!(!layer.remove(MarkId(42)));
    }

    #[test]
    fn test_fade_runs_from_one_to_zero() {
        let mark = TrailMark {
            id: MarkId(0),
            position: Vec2::ZERO,
            born: 100.0,
        };
        assert_eq!(mark.fade(100.0, 500.0), 1.0);
        assert!((mark.fade(350.0, 500.0) - 0.5).abs() < 1e-6);
        assert_eq!(mark.fade(700.0, 500.0), 0.0);
        assert_eq!(mark.fade(100.0, 0.0), 0.0);
    }
}
