//! # Message-level dedup
//!
//! A seen-set keyed by `message_id` with a 5-minute TTL, consulted before
//! routing any inbound request. A duplicate is acknowledged with `ACK` but
//! otherwise suppressed, preserving at-most-once callback delivery.
//!
//! Generalizes the nonce-cache shape this workspace already used for
//! replay prevention: a concurrent map from id to first-seen instant, with
//! lazy garbage collection driven off the same calls that check it rather
//! than a background task.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

pub struct MessageDedup {
    seen: DashMap<Uuid, Instant>,
    ttl: Duration,
    gc_interval: Duration,
    last_gc: std::sync::Mutex<Instant>,
}

impl MessageDedup {
    pub const DEFAULT_TTL_SECS: u64 = 300;
    const DEFAULT_GC_INTERVAL_SECS: u64 = 30;

    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(Self::DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            seen: DashMap::new(),
            ttl,
            gc_interval: Duration::from_secs(Self::DEFAULT_GC_INTERVAL_SECS),
            last_gc: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Returns `true` if `message_id` has not been seen within the TTL
    /// window (and records it as seen now); `false` if it's a duplicate.
    pub fn check_and_record(&self, message_id: Uuid) -> bool {
        self.maybe_gc();
        match self.seen.entry(message_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(v) => {
                v.insert(Instant::now());
                true
            }
        }
    }

    pub fn contains(&self, message_id: &Uuid) -> bool {
        self.seen.contains_key(message_id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn maybe_gc(&self) {
        let mut last_gc = self.last_gc.lock().expect("dedup gc lock poisoned");
        if last_gc.elapsed() < self.gc_interval {
            return;
        }
        *last_gc = Instant::now();
        let ttl = self.ttl;
        self.seen.retain(|_, seen_at| seen_at.elapsed() < ttl);
    }
}

impl Default for MessageDedup {
    fn default() -> Self {
        Self::new()
    }
}
