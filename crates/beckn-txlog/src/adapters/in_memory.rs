//! In-process repository backed by a concurrent map, keyed by
//! `message_id`. Used by single-node deployments and by tests.

use beckn_types::{TransactionLogEntry, TransactionStatus};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::TxLogError;
use crate::ports::outbound::TransactionLogRepository;

#[derive(Default)]
pub struct InMemoryTransactionLog {
    entries: DashMap<Uuid, TransactionLogEntry>,
}

impl InMemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TransactionLogRepository for InMemoryTransactionLog {
    async fn record(&self, entry: TransactionLogEntry) -> Result<(), TxLogError> {
        self.entries.insert(entry.message_id, entry);
        Ok(())
    }

    async fn mark_status(
        &self,
        message_id: Uuid,
        status: TransactionStatus,
        response_body: Option<Value>,
        latency_ms: Option<u64>,
        error: Option<Value>,
    ) -> Result<(), TxLogError> {
        let mut entry = self.entries.get_mut(&message_id).ok_or(TxLogError::NotFound(message_id))?;
        entry.status = status;
        entry.response_body = response_body;
        entry.latency_ms = latency_ms;
        entry.error = error;
        Ok(())
    }

    async fn get_by_message_id(&self, message_id: Uuid) -> Result<Option<TransactionLogEntry>, TxLogError> {
        Ok(self.entries.get(&message_id).map(|e| e.clone()))
    }

    async fn list_by_transaction_id(&self, transaction_id: Uuid) -> Result<Vec<TransactionLogEntry>, TxLogError> {
        Ok(self.entries.iter().filter(|e| e.transaction_id == transaction_id).map(|e| e.clone()).collect())
    }

    async fn list_pending_older_than(
        &self,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<TransactionLogEntry>, TxLogError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.status == TransactionStatus::Sent && e.created_at < older_than)
            .map(|e| e.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(message_id: Uuid, transaction_id: Uuid) -> TransactionLogEntry {
        TransactionLogEntry {
            id: Uuid::new_v4(),
            transaction_id,
            message_id,
            action: "search".into(),
            bap_id: "bap1".into(),
            bpp_id: None,
            domain: "ONDC:RET10".into(),
            city: "std:011".into(),
            request_body: json!({}),
            response_body: None,
            status: TransactionStatus::Sent,
            latency_ms: None,
            error: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn record_then_get_round_trips() {
        let repo = InMemoryTransactionLog::new();
        let message_id = Uuid::new_v4();
        repo.record(entry(message_id, Uuid::new_v4())).await.unwrap();
        let found = repo.get_by_message_id(message_id).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn mark_status_updates_existing_entry() {
        let repo = InMemoryTransactionLog::new();
        let message_id = Uuid::new_v4();
        repo.record(entry(message_id, Uuid::new_v4())).await.unwrap();
        repo.mark_status(message_id, TransactionStatus::Ack, Some(json!({"ok": true})), Some(120), None)
            .await
            .unwrap();
        let found = repo.get_by_message_id(message_id).await.unwrap().unwrap();
        assert_eq!(found.status, TransactionStatus::Ack);
        assert_eq!(found.latency_ms, Some(120));
    }

    #[tokio::test]
    async fn mark_status_on_unknown_entry_errors() {
        let repo = InMemoryTransactionLog::new();
        let result = repo.mark_status(Uuid::new_v4(), TransactionStatus::Ack, None, None, None).await;
        assert!(matches!(result, Err(TxLogError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_by_transaction_id_filters_correctly() {
        let repo = InMemoryTransactionLog::new();
        let txn = Uuid::new_v4();
        repo.record(entry(Uuid::new_v4(), txn)).await.unwrap();
        repo.record(entry(Uuid::new_v4(), txn)).await.unwrap();
        repo.record(entry(Uuid::new_v4(), Uuid::new_v4())).await.unwrap();
        assert_eq!(repo.list_by_transaction_id(txn).await.unwrap().len(), 2);
    }
}
