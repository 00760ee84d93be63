//! # Message Envelope
//!
//! The outer shape of every Beckn request and callback: a [`Context`] plus
//! an action-specific `message`. `message` is kept as a raw [`serde_json::Value`]
//! rather than a tagged enum of per-action payloads, on purpose: the gateway
//! fans a `search` envelope out to many BPPs without ever needing to know
//! its shape, and a typed enum would silently drop fields the protocol adds
//! later. Components that need structured access (BAP/BPP domain logic)
//! pull a typed view out of `message` with `serde_json::from_value` at the
//! point of use.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::errors::WireError;

/// The outer shape of every `action`/`on_action` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub context: Context,
    pub message: serde_json::Value,
}

impl Envelope {
    pub fn new(context: Context, message: serde_json::Value) -> Self {
        Self { context, message }
    }

    /// Deserialize `message` into a typed payload. Returns a
    /// [`crate::errors::BecknError`] with [`crate::errors::codes::CONTEXT_MALFORMED`]
    /// on shape mismatch.
    pub fn message_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::errors::BecknError> {
        serde_json::from_value(self.message.clone()).map_err(|e| {
            crate::errors::BecknError::context(
                crate::errors::codes::CONTEXT_MALFORMED,
                format!("message does not match expected shape for '{}': {e}", self.context.action),
            )
        })
    }
}

/// The synchronous HTTP-level acknowledgement every Beckn endpoint returns
/// immediately, independent of whatever asynchronous callback follows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: AckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckStatus {
    pub ack: Ack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: AckValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckValue {
    #[serde(rename = "ACK")]
    Ack,
    #[serde(rename = "NACK")]
    Nack,
}

impl AckResponse {
    pub fn ack() -> Self {
        Self { message: AckStatus { ack: Ack { status: AckValue::Ack } }, error: None }
    }

    pub fn nack(error: WireError) -> Self {
        Self { message: AckStatus { ack: Ack { status: AckValue::Nack } }, error: Some(error) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Context {
        crate::context::ContextBuilder {
            domain: "ONDC:RET10".into(),
            country: "IND".into(),
            city: "std:011".into(),
            action: "search".into(),
            core_version: "1.2.0".into(),
            bap_id: "bap1".into(),
            bap_uri: "https://bap1.example.com".into(),
            bpp_id: None,
            bpp_uri: None,
            transaction_id: None,
            ttl: None,
            max_callbacks: None,
        }
        .build()
    }

    #[test]
    fn ack_serializes_without_error_field() {
        let resp = AckResponse::ack();
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["message"]["ack"]["status"], "ACK");
        assert!(v.get("error").is_none());
    }

    #[test]
    fn message_as_reports_context_error_on_mismatch() {
        let env = Envelope::new(ctx(), json!({"intent": {"category_id": "grocery"}}));
        #[derive(serde::Deserialize)]
        struct WrongShape {
            #[allow(dead_code)]
            order: String,
        }
        let err = env.message_as::<WrongShape>().unwrap_err();
        assert_eq!(err.code, crate::errors::codes::CONTEXT_MALFORMED);
    }
}
