//! # Outbound port (driven side)
//!
//! One subscriber table, one extension-tuple table, one pending-challenge
//! slot per subscriber, one append-only audit trail.

use beckn_types::{Subscriber, SubscriberDomain};

use crate::domain::audit::AuditEntry;
use crate::domain::errors::RegistryError;
use crate::domain::types::PendingChallenge;

#[async_trait::async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn get(&self, subscriber_id: &str) -> Result<Option<Subscriber>, RegistryError>;

    async fn upsert(&self, subscriber: Subscriber) -> Result<(), RegistryError>;

    async fn delete(&self, subscriber_id: &str) -> Result<(), RegistryError>;

    async fn list(&self) -> Result<Vec<Subscriber>, RegistryError>;

    async fn list_domain_extensions(&self) -> Result<Vec<SubscriberDomain>, RegistryError>;

    async fn put_pending_challenge(&self, challenge: PendingChallenge) -> Result<(), RegistryError>;

    async fn take_pending_challenge(&self, subscriber_id: &str) -> Result<Option<PendingChallenge>, RegistryError>;

    async fn append_audit(&self, entry: AuditEntry) -> Result<(), RegistryError>;

    async fn list_audit(&self, subscriber_id: &str) -> Result<Vec<AuditEntry>, RegistryError>;
}
