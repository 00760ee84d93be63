//! In-process subscriber table for tests and single-node dev, keyed by
//! `subscriber_id`.

use beckn_types::{Subscriber, SubscriberDomain};
use dashmap::DashMap;

use crate::domain::audit::AuditEntry;
use crate::domain::errors::RegistryError;
use crate::domain::types::PendingChallenge;
use crate::ports::outbound::SubscriberRepository;

#[derive(Default)]
pub struct InMemorySubscriberRepository {
    subscribers: DashMap<String, Subscriber>,
    domain_extensions: DashMap<String, SubscriberDomain>,
    pending_challenges: DashMap<String, PendingChallenge>,
    audit: DashMap<String, Vec<AuditEntry>>,
}

impl InMemorySubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/seed helper: admit a `SubscriberDomain` extension tuple.
    pub fn add_domain_extension(&self, ext: SubscriberDomain) {
        let key = format!("{}|{}|{}", ext.subscriber_id, ext.domain, ext.city);
        self.domain_extensions.insert(key, ext);
    }
}

#[async_trait::async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn get(&self, subscriber_id: &str) -> Result<Option<Subscriber>, RegistryError> {
        Ok(self.subscribers.get(subscriber_id).map(|s| s.clone()))
    }

    async fn upsert(&self, subscriber: Subscriber) -> Result<(), RegistryError> {
        self.subscribers.insert(subscriber.subscriber_id.clone(), subscriber);
        Ok(())
    }

    async fn delete(&self, subscriber_id: &str) -> Result<(), RegistryError> {
        self.subscribers.remove(subscriber_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Subscriber>, RegistryError> {
        Ok(self.subscribers.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_domain_extensions(&self) -> Result<Vec<SubscriberDomain>, RegistryError> {
        Ok(self.domain_extensions.iter().map(|e| e.value().clone()).collect())
    }

    async fn put_pending_challenge(&self, challenge: PendingChallenge) -> Result<(), RegistryError> {
        self.pending_challenges.insert(challenge.subscriber_id.clone(), challenge);
        Ok(())
    }

    async fn take_pending_challenge(&self, subscriber_id: &str) -> Result<Option<PendingChallenge>, RegistryError> {
        Ok(self.pending_challenges.remove(subscriber_id).map(|(_, v)| v))
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<(), RegistryError> {
        self.audit.entry(entry.subscriber_id.clone()).or_default().push(entry);
        Ok(())
    }

    async fn list_audit(&self, subscriber_id: &str) -> Result<Vec<AuditEntry>, RegistryError> {
        Ok(self.audit.get(subscriber_id).map(|v| v.clone()).unwrap_or_default())
    }
}
