//! # Core Domain Entities
//!
//! Wire-level entities shared across the registry, gateway, BAP and BPP
//! engines. Order-specific entities (`Order`, `OrderState`) live in
//! `beckn-orders`, whose crate owns that lifecycle; everything here is a
//! non-owning, structurally-shared vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three participant roles in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriberType {
    #[serde(rename = "BAP")]
    Bap,
    #[serde(rename = "BPP")]
    Bpp,
    #[serde(rename = "BG")]
    Bg,
}

/// Subscriber lifecycle status. Only `Subscribed` records within their
/// validity window may appear in lookup results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriberStatus {
    #[serde(rename = "INITIATED")]
    Initiated,
    #[serde(rename = "UNDER_SUBSCRIPTION")]
    UnderSubscription,
    #[serde(rename = "SUBSCRIBED")]
    Subscribed,
    #[serde(rename = "SUSPENDED")]
    Suspended,
    #[serde(rename = "REVOKED")]
    Revoked,
}

/// Identity record of a BAP/BPP/BG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub subscriber_id: String,
    pub subscriber_url: String,
    pub r#type: SubscriberType,
    pub signing_public_key: String,
    pub encr_public_key: String,
    pub unique_key_id: String,
    pub domain: String,
    pub city: String,
    pub status: SubscriberStatus,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl Subscriber {
    /// Only `SUBSCRIBED` records within their validity window may appear
    /// in a lookup result.
    pub fn is_lookup_eligible(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriberStatus::Subscribed && self.valid_from <= now && now <= self.valid_until
    }

    /// A lookup matches the primary `(domain, city)` tuple OR any active
    /// `SubscriberDomain` extension.
    pub fn matches(&self, domain: Option<&str>, city: Option<&str>, extensions: &[SubscriberDomain]) -> bool {
        let primary_matches = domain.is_none_or(|d| d == self.domain) && city.is_none_or(|c| c == self.city);
        if primary_matches {
            return true;
        }
        extensions.iter().any(|ext| {
            ext.subscriber_id == self.subscriber_id
                && ext.active
                && domain.is_none_or(|d| d == ext.domain)
                && city.is_none_or(|c| c == ext.city)
        })
    }
}

/// A many-to-many extension of a subscriber's domain/city participation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberDomain {
    pub subscriber_id: String,
    pub domain: String,
    pub city: String,
    pub active: bool,
}

/// Transaction log entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Sent,
    Ack,
    Nack,
    CallbackReceived,
    Timeout,
    Error,
}

/// An immutable record of one inbound or outbound protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLogEntry {
    pub id: uuid::Uuid,
    pub transaction_id: uuid::Uuid,
    pub message_id: uuid::Uuid,
    pub action: String,
    pub bap_id: String,
    pub bpp_id: Option<String>,
    pub domain: String,
    pub city: String,
    pub request_body: serde_json::Value,
    pub response_body: Option<serde_json::Value>,
    pub status: TransactionStatus,
    pub latency_ms: Option<u64>,
    pub error: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A price amount with currency, as carried on items and quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    pub currency: String,
    pub value: String,
}

impl Price {
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

/// Free-text/code description shared by providers, items and categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
}

/// One `code -> [value, ...]` tag, grouped under a tag group in the wire
/// format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub code: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagGroup {
    pub code: String,
    #[serde(default)]
    pub list: Vec<Tag>,
}

/// A point in time, as the wire format's `time.timestamp` nests it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTime {
    pub timestamp: DateTime<Utc>,
}

/// A catalog line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub descriptor: Descriptor,
    pub price: Price,
    pub category_id: Option<String>,
    pub fulfillment_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    pub time: Option<ItemTime>,
    #[serde(default)]
    pub tags: Vec<TagGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
}

/// A fulfillment option/leg (delivery, pickup, …) a provider exposes or an
/// order carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fulfillment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Descriptor>,
    #[serde(default)]
    pub tags: Vec<TagGroup>,
}

/// A seller as carried inside a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub descriptor: Descriptor,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

/// A full catalog as returned by `on_search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub providers: Vec<Provider>,
    /// ISO-8601 expiry instant, present when this catalog snapshot is
    /// stale or has expired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<DateTime<Utc>>,
}

/// A buyer's search intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub tags: Vec<TagGroup>,
}

impl Intent {
    /// The `catalog_inc` incremental-sync tag, if the buyer asked for a
    /// delta against a prior `timestamp`.
    pub fn incremental_since(&self) -> Option<DateTime<Utc>> {
        self.tags
            .iter()
            .find(|g| g.code == "catalog_inc")
            .and_then(|g| g.list.iter().find(|t| t.code == "timestamp"))
            .and_then(|t| DateTime::parse_from_rfc3339(&t.value).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Billing details attached to an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Billing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payment status carried on `confirm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "NOT-PAID")]
    NotPaid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// A priced breakdown of an order, returned in `on_select`/`on_init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    pub price: Option<Price>,
    #[serde(default)]
    pub breakup: Vec<QuoteBreakupLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBreakupLine {
    pub title: String,
    pub price: Price,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sub(status: SubscriberStatus, domain: &str, city: &str) -> Subscriber {
        let now = Utc::now();
        Subscriber {
            subscriber_id: "bpp1".into(),
            subscriber_url: "https://bpp1.example.com".into(),
            r#type: SubscriberType::Bpp,
            signing_public_key: "x".into(),
            encr_public_key: "y".into(),
            unique_key_id: "k1".into(),
            domain: domain.into(),
            city: city.into(),
            status,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(365),
        }
    }

    #[test]
    fn only_subscribed_in_window_is_lookup_eligible() {
        let s = sub(SubscriberStatus::Subscribed, "ONDC:RET10", "std:011");
        assert!(s.is_lookup_eligible(Utc::now()));
        let suspended = sub(SubscriberStatus::Suspended, "ONDC:RET10", "std:011");
        assert!(!suspended.is_lookup_eligible(Utc::now()));
    }

    #[test]
    fn matches_via_extension_domain() {
        let s = sub(SubscriberStatus::Subscribed, "ONDC:RET10", "std:011");
        let ext = vec![SubscriberDomain {
            subscriber_id: "bpp1".into(),
            domain: "ONDC:RET11".into(),
            city: "std:080".into(),
            active: true,
        }];
        assert!(s.matches(Some("ONDC:RET11"), Some("std:080"), &ext));
        assert!(!s.matches(Some("ONDC:RET12"), Some("std:080"), &ext));
    }

    #[test]
    fn intent_extracts_incremental_timestamp() {
        let intent = Intent {
            tags: vec![TagGroup {
                code: "catalog_inc".into(),
                list: vec![Tag { code: "timestamp".into(), value: "2026-01-01T00:00:05Z".into() }],
            }],
            ..Default::default()
        };
        assert!(intent.incremental_since().is_some());
    }
}
