use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

struct Slot<V> {
    entry: Option<Entry<V>>,
    /// Generation of the most recently started load for this key
    latest: u64,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            entry: None,
            latest: 0,
        }
    }
}

/// Claim on a load started with [`SnapshotCache::begin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    pub key: K,
    pub generation: u64,
}

/// Keyed snapshots with a time-to-live.
///
/// Loads are tracked by generation: only the result of the newest load started
/// for a key is stored, an older one finishing late is dropped. The lock is
/// never held across an `.await`.
pub struct SnapshotCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
    next_generation: Mutex<u64>,
}

impl<K, V> SnapshotCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
            next_generation: Mutex::new(0),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached value if it is younger than the TTL
    pub fn fresh(&self, key: &K) -> Option<V> {
        let slots = self.slots();
        let entry = slots.get(key)?.entry.as_ref()?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Start a load for `key`; every earlier ticket for the key becomes stale
    pub fn begin(&self, key: K) -> Ticket<K> {
        let generation = {
            let mut next = self
                .next_generation
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *next += 1;
            *next
        };
        let mut slots = self.slots();
        slots.entry(key.clone()).or_default().latest = generation;
        Ticket { key, generation }
    }

    /// Store the result of a load. Returns `false` when a newer load for the
    /// same key was started in the meantime and the value was dropped.
    pub fn complete(&self, ticket: Ticket<K>, value: V) -> bool {
        let mut slots = self.slots();
        let slot = slots.entry(ticket.key.clone()).or_default();
        if slot.latest != ticket.generation {
            tracing::debug!(
                "Dropping stale snapshot for {:?} (generation {} < {})",
                ticket.key,
                ticket.generation,
                slot.latest
            );
            return false;
        }
        slot.entry = Some(Entry {
            value,
            stored_at: Instant::now(),
        });
        true
    }
}
