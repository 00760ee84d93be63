//! Minimal per-action payload shapes the state machine needs out of an
//! inbound `message` body. Deliberately narrower than the full Beckn order
//! schema — only the fields §4.9 actually reads.

use beckn_types::{Billing, Fulfillment, Item, Payment, Provider, Quote};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SelectPayload {
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitPayload {
    #[serde(default)]
    pub billing: Option<Billing>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPayload {
    #[serde(default)]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub quote: Option<Quote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelPayload {
    pub cancellation_reason_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePayload {
    #[serde(default)]
    pub billing: Option<Billing>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
    #[serde(default)]
    pub reason_id: Option<String>,
}

impl UpdatePayload {
    /// A `return_request` fulfillment tag marks this `update` as a return
    /// rather than an ordinary field diff (§4.9).
    pub fn is_return_request(&self) -> bool {
        self.fulfillments
            .iter()
            .any(|f| f.tags.iter().any(|g| g.code == "return_request"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingPayload {
    pub value: u8,
}
