//! In-memory entry store.
//!
//! A process-wide map from [`CacheKey`] to cached payloads, constructed once
//! at client start and injected into everything that needs it. There is no
//! persistence: entries live exactly as long as the process.
//!
//! # Thread safety
//!
//! The map sits behind an `RwLock` that is never held across an await point;
//! callers take a clone of the entry out of the lock. Statistics are tracked
//! under their own lock so read-heavy paths do not contend with sweeps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::key::CacheKey;

/// A cached payload with its freshness bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body.
    pub value: Value,
    /// When the value was stored (or last refreshed in place).
    pub stored_at: DateTime<Utc>,
    /// How long after `stored_at` the entry counts as fresh.
    pub ttl: Duration,
}

impl CacheEntry {
    /// Whether this entry is fresh at `now`.
    ///
    /// Fresh means `now - stored_at < ttl`. A stale entry is still served
    /// under stale-while-revalidate; staleness only changes what the fetch
    /// orchestrator does next.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.stored_at) < self.ttl
    }

    /// Whether this entry is fresh right now.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    /// Age of the entry.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.stored_at)
    }
}

/// Counters describing store behavior, for observability and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`; zero when nothing has been read yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// One occupied slot: the entry plus its recency stamp.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    last_access: u64,
}

/// The in-memory entry store.
#[derive(Debug, Default)]
pub struct EntryStore {
    slots: RwLock<HashMap<CacheKey, Slot>>,
    stats: RwLock<CacheStats>,
    /// Monotonic access clock for LRU ordering.
    clock: AtomicU64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry, bumping its recency and the hit/miss counters.
    ///
    /// Absence is not an error; the caller decides what a miss means.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let tick = self.clock.fetch_add(1, Ordering::Relaxed);
        let mut slots = self.slots.write().expect("entry store lock poisoned");
        let found = slots.get_mut(key).map(|slot| {
            slot.last_access = tick;
            slot.entry.clone()
        });
        drop(slots);

        let mut stats = self.stats.write().expect("stats lock poisoned");
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Look up an entry without touching recency or counters.
    ///
    /// Used by the read-only probes (`has_cache` / `get_cached_only`) so
    /// that optimistic UI polling does not distort LRU order or hit rates.
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.slots
            .read()
            .expect("entry store lock poisoned")
            .get(key)
            .map(|slot| slot.entry.clone())
    }

    /// Store a value under `key`, replacing any previous entry and
    /// resetting its `stored_at`.
    pub fn insert(&self, key: CacheKey, value: Value, ttl_minutes: u32) {
        self.insert_at(key, value, ttl_minutes, Utc::now());
    }

    /// Store a value with an explicit `stored_at` timestamp.
    ///
    /// Production code always goes through [`insert`](Self::insert); the
    /// explicit timestamp exists so tests can backdate entries across the
    /// freshness boundary without sleeping.
    pub fn insert_at(
        &self,
        key: CacheKey,
        value: Value,
        ttl_minutes: u32,
        stored_at: DateTime<Utc>,
    ) {
        let tick = self.clock.fetch_add(1, Ordering::Relaxed);
        let entry = CacheEntry {
            value,
            stored_at,
            ttl: Duration::minutes(i64::from(ttl_minutes)),
        };
        let mut slots = self.slots.write().expect("entry store lock poisoned");
        slots.insert(
            key,
            Slot {
                entry,
                last_access: tick,
            },
        );
        let count = slots.len() as u64;
        drop(slots);
        self.stats.write().expect("stats lock poisoned").entry_count = count;
    }

    /// Remove a single entry. Returns whether anything was removed.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut slots = self.slots.write().expect("entry store lock poisoned");
        let removed = slots.remove(key).is_some();
        let count = slots.len() as u64;
        drop(slots);
        self.stats.write().expect("stats lock poisoned").entry_count = count;
        removed
    }

    /// Remove every entry whose key matches `predicate`, returning the
    /// number removed. This is the primitive invalidation is built on.
    pub fn remove_matching(&self, predicate: impl Fn(&CacheKey) -> bool) -> usize {
        let mut slots = self.slots.write().expect("entry store lock poisoned");
        let before = slots.len();
        slots.retain(|key, _| !predicate(key));
        let removed = before - slots.len();
        let count = slots.len() as u64;
        drop(slots);
        self.stats.write().expect("stats lock poisoned").entry_count = count;
        removed
    }

    /// Drop everything. Used on logout and between tests.
    pub fn clear(&self) {
        self.slots
            .write()
            .expect("entry store lock poisoned")
            .clear();
        self.stats.write().expect("stats lock poisoned").entry_count = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.read().expect("entry store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.read().expect("stats lock poisoned").clone()
    }

    /// Evict least-recently-used entries until at most `max_entries`
    /// remain, skipping keys for which `protect` returns true (entries with
    /// an in-flight refresh must never be evicted). Returns the number
    /// evicted.
    pub fn evict_to_cap(
        &self,
        max_entries: usize,
        protect: impl Fn(&CacheKey) -> bool,
    ) -> usize {
        let mut slots = self.slots.write().expect("entry store lock poisoned");
        if slots.len() <= max_entries {
            return 0;
        }
        let excess = slots.len() - max_entries;

        let mut candidates: Vec<(CacheKey, u64)> = slots
            .iter()
            .filter(|(key, _)| !protect(key))
            .map(|(key, slot)| (key.clone(), slot.last_access))
            .collect();
        candidates.sort_by_key(|(_, last_access)| *last_access);

        let mut evicted = 0;
        for (key, _) in candidates.into_iter().take(excess) {
            slots.remove(&key);
            evicted += 1;
        }
        let count = slots.len() as u64;
        drop(slots);

        let mut stats = self.stats.write().expect("stats lock poisoned");
        stats.entry_count = count;
        stats.evictions += evicted as u64;
        evicted
    }
}
