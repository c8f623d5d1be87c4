use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default settle time for continuous edits such as slider drags.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Clone, Debug)]
struct Pending<V> {
    value: V,
    due: Instant,
    seq: u64,
}

/// Per-key trailing-edge debouncer.
///
/// Each key is idle until a value is submitted, then pending until `delay` has passed without a
/// newer submission for the same key, then committed by [`Debouncer::poll`]. Time is passed in
/// explicitly; the debouncer never reads a clock.
#[derive(Clone, Debug)]
pub struct Debouncer<K, V> {
    delay: Duration,
    pending: HashMap<K, Pending<V>>,
    seq: u64,
}

impl<K: Eq + Hash + Clone, V> Default for Debouncer<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<K: Eq + Hash + Clone, V> Debouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            seq: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record `value` for `key`, replacing any pending value and restarting its timer.
    ///
    /// Returns `true` when a pending value was superseded.
    pub fn submit(&mut self, key: K, value: V, now: Instant) -> bool {
        self.seq += 1;
        let entry = Pending {
            value,
            due: now + self.delay,
            seq: self.seq,
        };
        self.pending.insert(key, entry).is_some()
    }

    /// Take every value whose deadline is at or before `now`, oldest submission first.
    pub fn poll(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(k, _)| k.clone())
            .collect();
        self.take(due)
    }

    /// Take every pending value regardless of deadline, oldest submission first.
    pub fn flush(&mut self) -> Vec<(K, V)> {
        let all: Vec<K> = self.pending.keys().cloned().collect();
        self.take(all)
    }

    fn take(&mut self, keys: Vec<K>) -> Vec<(K, V)> {
        let mut out: Vec<(u64, K, V)> = keys
            .into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (p.seq, k, p.value)))
            .collect();
        out.sort_by_key(|(seq, _, _)| *seq);
        out.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|p| p.value)
    }

    /// Drop every pending value whose key matches `pred`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|k, _| !pred(k));
        before - self.pending.len()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending keys.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/debounce.rs"]
mod tests;
