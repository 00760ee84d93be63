//! # Outbound port (driven side)
//!
//! The BPP engine is the sole owner of `Order` rows (§3 Ownership); this
//! port is how it persists them. The BAP never writes through this port —
//! it keeps its own read-only projection built from the `on_*` callback
//! stream instead.

use uuid::Uuid;

use crate::domain::errors::OrderError;
use crate::domain::types::{Order, StateTransition};

#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<(), OrderError>;

    async fn get_by_transaction_id(&self, transaction_id: Uuid) -> Result<Option<Order>, OrderError>;

    async fn get_by_order_id(&self, order_id: &str) -> Result<Option<Order>, OrderError>;

    async fn save(&self, order: Order) -> Result<(), OrderError>;

    async fn append_transition(&self, transition: StateTransition) -> Result<(), OrderError>;

    async fn list_transitions(&self, order_id: &str) -> Result<Vec<StateTransition>, OrderError>;
}
