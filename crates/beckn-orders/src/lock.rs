//! # Per-transaction serialization
//!
//! §4.7/§5: concurrent `select`/`init`/`confirm` on the same
//! `transaction_id` must not race. A `DashMap<Uuid, Arc<Mutex<()>>>` keyed
//! lock table is the standard shape for this in a `tokio`-based service —
//! each transaction gets its own async mutex, created lazily and reused.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct TransactionLockTable {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl TransactionLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `transaction_id`, creating its entry on first
    /// use. The guard's lifetime is decoupled from the table via the
    /// `Arc`, so the table itself never blocks while a caller holds it.
    pub async fn lock(&self, transaction_id: Uuid) -> OwnedLockGuard {
        let mutex = self.locks.entry(transaction_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone();
        OwnedLockGuard { _guard: mutex.lock_owned().await }
    }
}

pub struct OwnedLockGuard {
    _guard: tokio::sync::OwnedMutexGuard<()>,
}
