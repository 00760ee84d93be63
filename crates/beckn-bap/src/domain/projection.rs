//! # Inbound callback projection
//!
//! A BAP has no order state machine of its own (that's the BPP's job,
//! §4.7) — it only ever observes what a BPP tells it. This is the
//! read model `GET /api/orders/:txn_id` and a polling integration read
//! from: the latest `on_*` body received for a transaction, keyed by
//! `transaction_id` the same way `beckn_catalog`'s in-memory adapter
//! keys stored catalogs by provider.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CallbackProjection {
    pub event: String,
    pub body: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct ProjectionStore {
    latest: DashMap<Uuid, CallbackProjection>,
}

impl ProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, transaction_id: Uuid, event: impl Into<String>, body: serde_json::Value) {
        self.latest.insert(transaction_id, CallbackProjection { event: event.into(), body, received_at: Utc::now() });
    }

    pub fn get(&self, transaction_id: &Uuid) -> Option<CallbackProjection> {
        self.latest.get(transaction_id).map(|v| v.clone())
    }
}
