//! # Order entity and lifecycle vocabulary
//!
//! `Order` is owned by the BPP engine (§3 Ownership); the BAP only ever
//! holds a read-only projection built from the `on_*` callback stream, so
//! nothing here depends on `beckn-bpp` and this crate never talks to the
//! network.

use beckn_types::{Billing, Fulfillment, Payment, Provider, Quote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six order states from §4.9. `Cancelled`/`Returned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Created,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    Returned,
}

impl OrderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderState::Cancelled | OrderState::Returned)
    }

    /// The allowed-transitions table from §4.9, as a static adjacency
    /// check — used both to drive real transitions and by the invariant
    /// test that no historical `(from, to)` pair falls outside it.
    pub fn can_transition_to(self, to: OrderState) -> bool {
        use OrderState::*;
        matches!(
            (self, to),
            (Created, Accepted)
                | (Created, Cancelled)
                | (Accepted, InProgress)
                | (Accepted, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (InProgress, Returned)
                | (Completed, Returned)
        )
    }
}

/// Who drove a state transition: the buyer side dispatching an action, or
/// the seller side via an in-band hook (e.g. BPP-internal fulfillment
/// progression from `ACCEPTED` to `IN_PROGRESS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Buyer,
    Seller,
}

/// One observed `(from, to)` edge, recorded every time an order mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub order_id: String,
    pub from: OrderState,
    pub to: OrderState,
    pub action: String,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub ts: DateTime<Utc>,
}

/// The order record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub transaction_id: Uuid,
    pub bap_id: String,
    pub bpp_id: String,
    pub domain: String,
    pub city: String,
    pub state: OrderState,
    pub provider: Option<Provider>,
    pub items: Vec<beckn_types::Item>,
    pub billing: Option<Billing>,
    pub fulfillments: Vec<Fulfillment>,
    pub quote: Option<Quote>,
    pub payment: Option<Payment>,
    pub cancellation_reason_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        transaction_id: Uuid,
        bap_id: impl Into<String>,
        bpp_id: impl Into<String>,
        domain: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            order_id: order_id.into(),
            transaction_id,
            bap_id: bap_id.into(),
            bpp_id: bpp_id.into(),
            domain: domain.into(),
            city: city.into(),
            state: OrderState::Created,
            provider: None,
            items: Vec::new(),
            billing: None,
            fulfillments: Vec::new(),
            quote: None,
            payment: None,
            cancellation_reason_code: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Standardized cancellation reason codes (§4.9): buyer-initiated
/// cancellation is `001`-`016`, seller-initiated is `017`-`020`.
pub fn is_valid_cancel_reason(actor: Actor, code: &str) -> bool {
    let range = match actor {
        Actor::Buyer => 1..=16,
        Actor::Seller => 17..=20,
    };
    matches!(code.parse::<u32>(), Ok(n) if range.contains(&n))
}

/// Standardized return reason codes: buyer `001`-`008`, seller `009`-`011`.
pub fn is_valid_return_reason(actor: Actor, code: &str) -> bool {
    let range = match actor {
        Actor::Buyer => 1..=8,
        Actor::Seller => 9..=11,
    };
    matches!(code.parse::<u32>(), Ok(n) if range.contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_outgoing_edges_except_completed_to_returned() {
        assert!(!OrderState::Cancelled.can_transition_to(OrderState::Accepted));
        assert!(!OrderState::Returned.can_transition_to(OrderState::Completed));
    }

    #[test]
    fn completed_may_only_transition_to_returned() {
        assert!(OrderState::Completed.can_transition_to(OrderState::Returned));
        assert!(!OrderState::Completed.can_transition_to(OrderState::Cancelled));
        assert!(!OrderState::Completed.can_transition_to(OrderState::InProgress));
    }

    #[test]
    fn cancel_reason_code_ranges() {
        assert!(is_valid_cancel_reason(Actor::Buyer, "001"));
        assert!(is_valid_cancel_reason(Actor::Buyer, "016"));
        assert!(!is_valid_cancel_reason(Actor::Buyer, "017"));
        assert!(is_valid_cancel_reason(Actor::Seller, "017"));
        assert!(is_valid_cancel_reason(Actor::Seller, "020"));
        assert!(!is_valid_cancel_reason(Actor::Seller, "016"));
        assert!(!is_valid_cancel_reason(Actor::Buyer, "021"));
        assert!(!is_valid_cancel_reason(Actor::Buyer, "abc"));
    }

    #[test]
    fn return_reason_code_ranges() {
        assert!(is_valid_return_reason(Actor::Seller, "009"));
        assert!(!is_valid_return_reason(Actor::Buyer, "009"));
        assert!(is_valid_return_reason(Actor::Buyer, "008"));
        assert!(!is_valid_return_reason(Actor::Seller, "012"));
    }
}
