//! In-process adapters: a fixed `subscriber_id -> public_key` table used
//! by tests in place of a real registry round trip, plus the default
//! single-node stores for grievances and settlements.

use dashmap::DashMap;

use crate::domain::errors::BppError;
use crate::domain::grievance::Issue;
use crate::domain::settlement::{ReconStatus, Settlement};
use crate::ports::outbound::{IssueRepository, RegistryLookup, SettlementRepository};

#[derive(Default)]
pub struct StaticRegistryLookup {
    keys: DashMap<String, String>,
}

impl StaticRegistryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscriber_id: impl Into<String>, signing_public_key: impl Into<String>) {
        self.keys.insert(subscriber_id.into(), signing_public_key.into());
    }
}

#[async_trait::async_trait]
impl RegistryLookup for StaticRegistryLookup {
    async fn signing_public_key(&self, subscriber_id: &str) -> Result<Option<String>, BppError> {
        Ok(self.keys.get(subscriber_id).map(|v| v.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryIssueRepository {
    issues: DashMap<String, Issue>,
}

impl InMemoryIssueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn insert(&self, issue: Issue) -> Result<(), BppError> {
        self.issues.insert(issue.issue_id.clone(), issue);
        Ok(())
    }

    async fn get(&self, issue_id: &str) -> Result<Option<Issue>, BppError> {
        Ok(self.issues.get(issue_id).map(|i| i.clone()))
    }

    async fn save(&self, issue: Issue) -> Result<(), BppError> {
        self.issues.insert(issue.issue_id.clone(), issue);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettlementRepository {
    settlements: DashMap<String, Settlement>,
}

impl InMemorySettlementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SettlementRepository for InMemorySettlementRepository {
    async fn record(&self, settlement: Settlement) -> Result<(), BppError> {
        self.settlements.insert(settlement.order_id.clone(), settlement);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<Settlement>, BppError> {
        Ok(self.settlements.get(order_id).map(|s| s.clone()))
    }

    async fn update_recon_status(&self, order_id: &str, recon_status: ReconStatus) -> Result<Settlement, BppError> {
        let mut entry = self.settlements.get_mut(order_id).ok_or_else(|| BppError::UnknownSettlement(order_id.to_string()))?;
        entry.recon_status = recon_status;
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::{ReconStatus, SettlementStatus};
    use chrono::Utc;

    #[tokio::test]
    async fn issue_round_trips_through_insert_and_get() {
        let repo = InMemoryIssueRepository::new();
        let issue = Issue::open("I1", None, "fulfillment", "delay", "late", None, None);
        repo.insert(issue).await.unwrap();
        assert!(repo.get("I1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn settlement_round_trips_through_record_and_get() {
        let repo = InMemorySettlementRepository::new();
        repo.record(Settlement {
            order_id: "O1".into(),
            collector_app_id: "bap1".into(),
            receiver_app_id: "bpp1".into(),
            settlement_status: SettlementStatus::Paid,
            recon_status: ReconStatus::Matched,
            amount: "100".into(),
            currency: "INR".into(),
            reference: None,
            timestamp: Utc::now(),
        })
        .await
        .unwrap();
        assert!(repo.get("O1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_recon_status_mutates_the_stored_settlement() {
        let repo = InMemorySettlementRepository::new();
        repo.record(Settlement {
            order_id: "O1".into(),
            collector_app_id: "bap1".into(),
            receiver_app_id: "bpp1".into(),
            settlement_status: SettlementStatus::Paid,
            recon_status: ReconStatus::Unmatched,
            amount: "100".into(),
            currency: "INR".into(),
            reference: None,
            timestamp: Utc::now(),
        })
        .await
        .unwrap();

        let updated = repo.update_recon_status("O1", ReconStatus::Matched).await.unwrap();
        assert_eq!(updated.recon_status, ReconStatus::Matched);
        assert_eq!(repo.get("O1").await.unwrap().unwrap().recon_status, ReconStatus::Matched);
    }

    #[tokio::test]
    async fn update_recon_status_on_unknown_order_is_rejected() {
        let repo = InMemorySettlementRepository::new();
        let err = repo.update_recon_status("missing", ReconStatus::Matched).await.unwrap_err();
        assert!(matches!(err, BppError::UnknownSettlement(_)));
    }
}
