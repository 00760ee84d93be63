//! In-process order store keyed by `order_id`, with a secondary
//! `transaction_id` index. Used by single-node deployments and tests.

use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::errors::OrderError;
use crate::domain::types::{Order, StateTransition};
use crate::ports::outbound::OrderRepository;

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<String, Order>,
    by_transaction: DashMap<Uuid, String>,
    transitions: DashMap<String, Vec<StateTransition>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<(), OrderError> {
        self.by_transaction.insert(order.transaction_id, order.order_id.clone());
        self.orders.insert(order.order_id.clone(), order);
        Ok(())
    }

    async fn get_by_transaction_id(&self, transaction_id: Uuid) -> Result<Option<Order>, OrderError> {
        let Some(order_id) = self.by_transaction.get(&transaction_id).map(|r| r.clone()) else {
            return Ok(None);
        };
        Ok(self.orders.get(&order_id).map(|o| o.clone()))
    }

    async fn get_by_order_id(&self, order_id: &str) -> Result<Option<Order>, OrderError> {
        Ok(self.orders.get(order_id).map(|o| o.clone()))
    }

    async fn save(&self, order: Order) -> Result<(), OrderError> {
        self.orders.insert(order.order_id.clone(), order);
        Ok(())
    }

    async fn append_transition(&self, transition: StateTransition) -> Result<(), OrderError> {
        self.transitions.entry(transition.order_id.clone()).or_default().push(transition);
        Ok(())
    }

    async fn list_transitions(&self, order_id: &str) -> Result<Vec<StateTransition>, OrderError> {
        Ok(self.transitions.get(order_id).map(|v| v.clone()).unwrap_or_default())
    }
}
