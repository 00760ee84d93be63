//! Registry-owned vocabulary layered on top of `beckn_types::Subscriber`.

use beckn_types::SubscriberType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VALIDITY_PERIOD_DAYS: i64 = 365;
pub const LOOKUP_CACHE_TTL_SECS: u64 = 300;

/// Inputs to `POST /subscribe`; a subset of `Subscriber`'s fields, since
/// `status`/`valid_from`/`valid_until` are registry-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub subscriber_id: String,
    pub subscriber_url: String,
    pub r#type: SubscriberType,
    pub domain: String,
    pub city: String,
    pub signing_public_key: String,
    pub encr_public_key: String,
    pub unique_key_id: String,
}

/// The plaintext nonce stashed alongside the subscriber while onboarding
/// is pending, and the ECIES-sealed form handed back to the caller.
#[derive(Debug, Clone)]
pub struct PendingChallenge {
    pub subscriber_id: String,
    pub plaintext_b64: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    /// Always the literal `"INITIATED"`, independent of the subscriber's
    /// actual persisted status (`UNDER_SUBSCRIPTION` by the time this
    /// response is built) — §4.4's documented response shape.
    pub status: &'static str,
    pub challenge: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnSubscribeRequest {
    pub subscriber_id: String,
    pub answer: String,
}

/// `POST /lookup` / `/vlookup` filter; every field is optional and ANDed
/// together, with domain/city each matching the primary tuple OR any
/// active `SubscriberDomain` extension.
#[derive(Debug, Clone, Default, Deserialize, Hash, PartialEq, Eq)]
pub struct LookupFilter {
    pub subscriber_id: Option<String>,
    pub r#type: Option<SubscriberTypeKey>,
    pub domain: Option<String>,
    pub city: Option<String>,
}

/// `SubscriberType` doesn't implement `Hash`/`Eq` (it round-trips through
/// serde renames, not worth extending for this); the filter cache key
/// only needs a flat tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SubscriberTypeKey {
    Bap,
    Bpp,
    Bg,
}

impl From<SubscriberType> for SubscriberTypeKey {
    fn from(t: SubscriberType) -> Self {
        match t {
            SubscriberType::Bap => SubscriberTypeKey::Bap,
            SubscriberType::Bpp => SubscriberTypeKey::Bpp,
            SubscriberType::Bg => SubscriberTypeKey::Bg,
        }
    }
}

impl LookupFilter {
    /// Stable string key for the lookup cache (§4.4: "cached ... keyed by
    /// filter tuple").
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{:?}|{}|{}",
            self.subscriber_id.as_deref().unwrap_or(""),
            self.r#type,
            self.domain.as_deref().unwrap_or(""),
            self.city.as_deref().unwrap_or(""),
        )
    }
}
