//! Bounded memo of per-day results.
//!
//! Entries are kept in insertion order; once more than `capacity` days are
//! resident the oldest-inserted ones go first. The cache also remembers a
//! fingerprint of the inputs it was filled under and empties itself when a
//! request arrives under a different one.

use crate::time::DayKey;
use crate::validate::Intersection;
use std::collections::VecDeque;
use std::sync::Arc;

/// Shared, immutable result list for one day.
pub type DayIntersections = Arc<[Intersection]>;

#[derive(Debug, Clone)]
pub struct IntersectionCache {
    capacity: usize,
    entries: VecDeque<(DayKey, DayIntersections)>,
    fingerprint: Option<u64>,
}

impl IntersectionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
            fingerprint: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, day: DayKey) -> bool {
        self.entries.iter().any(|(key, _)| *key == day)
    }

    pub fn get(&self, day: DayKey) -> Option<DayIntersections> {
        self.entries
            .iter()
            .find(|(key, _)| *key == day)
            .map(|(_, list)| Arc::clone(list))
    }

    /// Stores `list` as the newest entry for `day`, replacing any previous
    /// one, then evicts down to capacity.
    pub fn put(&mut self, day: DayKey, list: DayIntersections) {
        self.entries.retain(|(key, _)| *key != day);
        self.entries.push_back((day, list));
        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    pub fn evict_oldest(&mut self) -> Option<DayKey> {
        self.entries.pop_front().map(|(key, _)| key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.fingerprint = None;
    }

    /// Resident days, oldest first.
    pub fn days(&self) -> Vec<DayKey> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    /// Binds the cache to `fingerprint`. Returns `true` if resident entries
    /// were dropped because they were computed under different inputs.
    pub fn reconcile(&mut self, fingerprint: u64) -> bool {
        match self.fingerprint {
            Some(current) if current == fingerprint => false,
            _ => {
                let stale = !self.entries.is_empty();
                self.entries.clear();
                self.fingerprint = Some(fingerprint);
                stale
            }
        }
    }
}
