//! Lookup result cache, keyed by `LookupFilter::cache_key()` with a
//! 5-minute TTL (§4.4). Mirrors `beckn_context::MessageDedup`'s shape: a
//! concurrent map plus lazy GC driven off the calls that read it, not a
//! background task.

use std::time::{Duration, Instant};

use beckn_types::Subscriber;
use dashmap::DashMap;

use crate::domain::LOOKUP_CACHE_TTL_SECS;

pub struct LookupCache {
    entries: DashMap<String, (Instant, Vec<Subscriber>)>,
    ttl: Duration,
    gc_interval: Duration,
    last_gc: std::sync::Mutex<Instant>,
}

impl LookupCache {
    const DEFAULT_GC_INTERVAL_SECS: u64 = 30;

    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(LOOKUP_CACHE_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            gc_interval: Duration::from_secs(Self::DEFAULT_GC_INTERVAL_SECS),
            last_gc: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<Subscriber>> {
        self.maybe_gc();
        self.entries.get(key).filter(|(at, _)| at.elapsed() < self.ttl).map(|e| e.1.clone())
    }

    pub fn put(&self, key: String, subscribers: Vec<Subscriber>) {
        self.entries.insert(key, (Instant::now(), subscribers));
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    fn maybe_gc(&self) {
        let mut last_gc = self.last_gc.lock().expect("lookup cache gc lock poisoned");
        if last_gc.elapsed() < self.gc_interval {
            return;
        }
        *last_gc = Instant::now();
        let ttl = self.ttl;
        self.entries.retain(|_, (at, _)| at.elapsed() < ttl);
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_types::{SubscriberStatus, SubscriberType};
    use chrono::Utc;

    fn sub(id: &str) -> Subscriber {
        let now = Utc::now();
        Subscriber {
            subscriber_id: id.into(),
            subscriber_url: format!("https://{id}"),
            r#type: SubscriberType::Bpp,
            signing_public_key: "x".into(),
            encr_public_key: "y".into(),
            unique_key_id: "k1".into(),
            domain: "ONDC:RET10".into(),
            city: "std:011".into(),
            status: SubscriberStatus::Subscribed,
            valid_from: now,
            valid_until: now,
        }
    }

    #[test]
    fn miss_then_hit_after_put() {
        let cache = LookupCache::new();
        assert!(cache.get("k").is_none());
        cache.put("k".into(), vec![sub("a")]);
        assert_eq!(cache.get("k").unwrap().len(), 1);
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = LookupCache::with_ttl(Duration::from_millis(1));
        cache.put("k".into(), vec![sub("a")]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("k").is_none());
    }
}
