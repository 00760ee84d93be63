//! Simplified request/response shapes for the developer-facing `/api/*`
//! surface (§4.6, §6). A caller never builds a `Context` or signs
//! anything by hand; it supplies the handful of fields the action
//! actually needs and the engine does the rest.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every non-`search` action the outbound continues an existing
/// transaction against one BPP. `message` carries whatever fields that
/// action needs (billing, payment, cancellation reason, ...) and is
/// forwarded into the protocol envelope's `message` verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboundApiRequest {
    pub transaction_id: Uuid,
    pub bpp_id: String,
    pub bpp_uri: String,
    #[serde(default)]
    pub message: serde_json::Value,
}

/// `search` has no counterparty yet — the gateway resolves it — so the
/// simplified request only carries the buyer's intent.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchApiRequest {
    pub domain: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl SearchApiRequest {
    pub fn to_intent(&self) -> serde_json::Value {
        let mut descriptor = serde_json::Map::new();
        if let Some(query) = &self.query {
            descriptor.insert("name".to_string(), serde_json::Value::String(query.clone()));
        }
        let mut intent = serde_json::Map::new();
        if !descriptor.is_empty() {
            intent.insert("descriptor".to_string(), serde_json::Value::Object(descriptor));
        }
        if let Some(category_id) = &self.category_id {
            intent.insert("category_id".to_string(), serde_json::Value::String(category_id.clone()));
        }
        if let Some(provider_id) = &self.provider_id {
            intent.insert("provider_id".to_string(), serde_json::Value::String(provider_id.clone()));
        }
        serde_json::json!({ "intent": intent })
    }
}

/// The nine `on_*` actions the BAP fans out to a webhook and the
/// projection store, plus the identifying tag a freshly dispatched action
/// is tracked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundAction {
    Search,
    Select,
    Init,
    Confirm,
    Status,
    Track,
    Cancel,
    Update,
    Rating,
    Support,
}

impl OutboundAction {
    pub fn as_str(self) -> &'static str {
        match self {
            OutboundAction::Search => "search",
            OutboundAction::Select => "select",
            OutboundAction::Init => "init",
            OutboundAction::Confirm => "confirm",
            OutboundAction::Status => "status",
            OutboundAction::Track => "track",
            OutboundAction::Cancel => "cancel",
            OutboundAction::Update => "update",
            OutboundAction::Rating => "rating",
            OutboundAction::Support => "support",
        }
    }
}

/// The immediate response every `/api/<action>` call returns (§4.6,
/// §7): acceptance, not completion. Completion is observed later via
/// `/api/orders/:txn_id` or a webhook push.
#[derive(Debug, Clone, Serialize)]
pub struct ApiAckResponse {
    pub ack: &'static str,
    pub transaction_id: Uuid,
    pub message_id: Uuid,
}

impl ApiAckResponse {
    pub fn new(transaction_id: Uuid, message_id: Uuid) -> Self {
        Self { ack: "ACK", transaction_id, message_id }
    }
}

/// `GET /api/orders/:txn_id` response: the latest transaction status plus
/// the most recently observed `on_*` body, if any.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusResponse {
    pub transaction_id: Uuid,
    pub status: beckn_types::TransactionStatus,
    pub callback_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRegistrationRequest {
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
}
