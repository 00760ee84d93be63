//! # Outbound port (driven side)
//!
//! Every component that sends or receives a protocol message owns its own
//! log entries and writes through this port; nothing reads another
//! component's entries except by `transaction_id` for read-only audit and
//! status-query flows.

use beckn_types::{TransactionLogEntry, TransactionStatus};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::TxLogError;

#[async_trait::async_trait]
pub trait TransactionLogRepository: Send + Sync {
    async fn record(&self, entry: TransactionLogEntry) -> Result<(), TxLogError>;

    /// Mutate the single paired response/callback observation for an
    /// existing entry. Called at most once per entry.
    async fn mark_status(
        &self,
        message_id: Uuid,
        status: TransactionStatus,
        response_body: Option<Value>,
        latency_ms: Option<u64>,
        error: Option<Value>,
    ) -> Result<(), TxLogError>;

    async fn get_by_message_id(&self, message_id: Uuid) -> Result<Option<TransactionLogEntry>, TxLogError>;

    async fn list_by_transaction_id(&self, transaction_id: Uuid) -> Result<Vec<TransactionLogEntry>, TxLogError>;

    /// Entries whose `status == SENT` and whose `created_at` is older than
    /// `older_than`, used to detect timed-out outbound calls.
    async fn list_pending_older_than(
        &self,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<TransactionLogEntry>, TxLogError>;
}
