//! # Outbound ports (driven side)
//!
//! `RegistryLookup` mirrors `beckn_bap`'s: a BPP is a separate process
//! from the registry, so authenticating an inbound caller means a
//! network lookup, not an in-process repository call. `IssueRepository`
//! and `SettlementRepository` follow the same shape as
//! `beckn_orders::OrderRepository` and `beckn_catalog::CatalogRepository`
//! — the BPP is the sole owner of both (§3 Ownership).

use crate::domain::errors::BppError;
use crate::domain::grievance::Issue;
use crate::domain::settlement::{ReconStatus, Settlement};

#[async_trait::async_trait]
pub trait RegistryLookup: Send + Sync {
    /// The base64 Ed25519 signing public key registered for
    /// `subscriber_id`, or `None` if the registry has no `SUBSCRIBED`
    /// record for it.
    async fn signing_public_key(&self, subscriber_id: &str) -> Result<Option<String>, BppError>;
}

#[async_trait::async_trait]
pub trait IssueRepository: Send + Sync {
    async fn insert(&self, issue: Issue) -> Result<(), BppError>;
    async fn get(&self, issue_id: &str) -> Result<Option<Issue>, BppError>;
    async fn save(&self, issue: Issue) -> Result<(), BppError>;
}

#[async_trait::async_trait]
pub trait SettlementRepository: Send + Sync {
    async fn record(&self, settlement: Settlement) -> Result<(), BppError>;
    async fn get(&self, order_id: &str) -> Result<Option<Settlement>, BppError>;

    /// Applied by the out-of-band reconciliation job once it has compared
    /// the recorded settlement against the actual payout.
    async fn update_recon_status(&self, order_id: &str, recon_status: ReconStatus) -> Result<Settlement, BppError>;
}
