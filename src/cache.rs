//! Shared TTL cache.
//!
//! A process-wide key→value store with a fixed time-to-live per entry.
//! Entries are written wholesale and expire lazily on the next read past
//! their deadline; there is no background sweep. Keys are namespaced by a
//! prefix supplied at construction so test and runtime instances never
//! collide on the same logical key.

use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Namespaced key→value store with per-entry expiry.
///
/// Safe for concurrent use from any number of threads. Concurrent `set`
/// calls on the same key are last-writer-wins; entries are never patched in
/// place, so a reader can never observe a half-written value.
pub struct TtlCache<V> {
    namespace: String,
    ttl: Duration,
    entries: DashMap<String, Entry<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache whose keys live under `namespace` and expire after `ttl`.
    pub fn new(namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
            entries: DashMap::new(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Look up `key`, returning the stored value if present and unexpired.
    pub fn get(&self, key: &str) -> Option<V> {
        let full = self.namespaced(key);
        if let Some(entry) = self.entries.get(&full) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
            // Entry expired, remove it
            drop(entry);
            self.entries.remove(&full);
        }
        None
    }

    /// Store `value` under `key`, replacing any previous entry and resetting
    /// its deadline.
    pub fn set(&self, key: &str, value: V) {
        self.entries.insert(
            self.namespaced(key),
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}
