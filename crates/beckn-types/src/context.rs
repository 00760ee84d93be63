//! # Context — the per-message envelope
//!
//! The wire format is a long-running point of friction in the real Beckn
//! ecosystem: v1.1 participants send a flat `{country, city, core_version}`
//! triple, v1.2 participants send a nested `{location:{country,city},
//! version}` pair. Per the resolved Open Question, this engine emits
//! *both* shapes with identical values and accepts either on input,
//! failing only when both are present and disagree.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{codes, BecknError};

/// Canonical, validated context. Construction always goes through
/// [`Context::builder`] or `TryFrom<ContextWire>`, so a `Context` value in
/// hand has already survived the v1.1/v1.2 reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContextWire", into = "ContextWire")]
pub struct Context {
    pub domain: String,
    pub country: String,
    pub city: String,
    pub action: String,
    pub core_version: String,
    pub bap_id: String,
    pub bap_uri: String,
    pub bpp_id: Option<String>,
    pub bpp_uri: Option<String>,
    pub transaction_id: Uuid,
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub ttl: Option<String>,
    pub max_callbacks: Option<u32>,
    /// Any field neither v1.1 nor v1.2 knows about, preserved verbatim so
    /// a forwarded envelope round-trips byte-for-byte.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The on-the-wire shape: a superset of both the v1.1 flat fields and the
/// v1.2 nested fields. Never constructed directly in application code;
/// exists purely as the serde boundary type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContextWire {
    domain: String,
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<LocationWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    core_version: Option<String>,
    bap_id: String,
    bap_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bpp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bpp_uri: Option<String>,
    transaction_id: Uuid,
    message_id: Uuid,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_callbacks: Option<u32>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationWire {
    country: String,
    city: String,
}

impl TryFrom<ContextWire> for Context {
    type Error = BecknError;

    fn try_from(w: ContextWire) -> Result<Self, Self::Error> {
        let country = reconcile("country", w.country, w.location.as_ref().map(|l| l.country.clone()))?;
        let city = reconcile("city", w.city, w.location.as_ref().map(|l| l.city.clone()))?;
        let core_version = reconcile("core_version/version", w.core_version, w.version)?;

        // Every action except the initial `search` broadcast is already
        // scoped to one BPP (this covers all `on_*` callbacks too, since
        // none of them are named `search`).
        if w.action != "search" && (w.bpp_id.is_none() || w.bpp_uri.is_none()) {
            return Err(BecknError::context(
                codes::CONTEXT_MISSING_COUNTERPARTY,
                format!("action '{}' requires bpp_id and bpp_uri", w.action),
            ));
        }

        Ok(Context {
            domain: w.domain,
            country,
            city,
            action: w.action,
            core_version,
            bap_id: w.bap_id,
            bap_uri: w.bap_uri,
            bpp_id: w.bpp_id,
            bpp_uri: w.bpp_uri,
            transaction_id: w.transaction_id,
            message_id: w.message_id,
            timestamp: w.timestamp,
            ttl: w.ttl,
            max_callbacks: w.max_callbacks,
            extra: w.extra,
        })
    }
}

fn reconcile(field: &str, flat: Option<String>, nested: Option<String>) -> Result<String, BecknError> {
    match (flat, nested) {
        (Some(a), Some(b)) if a != b => Err(BecknError::context(
            codes::CONTEXT_LOCATION_VERSION_MISMATCH,
            format!("{field}: flat value '{a}' disagrees with nested value '{b}'"),
        )),
        (Some(a), _) => Ok(a),
        (None, Some(b)) => Ok(b),
        (None, None) => Err(BecknError::context(
            codes::CONTEXT_MALFORMED,
            format!("missing required context field: {field}"),
        )),
    }
}

impl From<Context> for ContextWire {
    fn from(c: Context) -> Self {
        ContextWire {
            domain: c.domain,
            action: c.action,
            location: Some(LocationWire { country: c.country.clone(), city: c.city.clone() }),
            version: Some(c.core_version.clone()),
            country: Some(c.country),
            city: Some(c.city),
            core_version: Some(c.core_version),
            bap_id: c.bap_id,
            bap_uri: c.bap_uri,
            bpp_id: c.bpp_id,
            bpp_uri: c.bpp_uri,
            transaction_id: c.transaction_id,
            message_id: c.message_id,
            timestamp: c.timestamp,
            ttl: c.ttl,
            max_callbacks: c.max_callbacks,
            extra: c.extra,
        }
    }
}

/// Parameters needed to build a fresh outbound `Context` for a new or
/// continuing transaction.
pub struct ContextBuilder {
    pub domain: String,
    pub country: String,
    pub city: String,
    pub action: String,
    pub core_version: String,
    pub bap_id: String,
    pub bap_uri: String,
    pub bpp_id: Option<String>,
    pub bpp_uri: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub ttl: Option<String>,
    pub max_callbacks: Option<u32>,
}

impl ContextBuilder {
    /// Build a context stamped with the current time and a fresh
    /// `message_id`. `transaction_id` is reused if supplied (a callback or
    /// a follow-up action on an existing transaction), otherwise minted.
    pub fn build(self) -> Context {
        Context {
            domain: self.domain,
            country: self.country,
            city: self.city,
            action: self.action,
            core_version: self.core_version,
            bap_id: self.bap_id,
            bap_uri: self.bap_uri,
            bpp_id: self.bpp_id,
            bpp_uri: self.bpp_uri,
            transaction_id: self.transaction_id.unwrap_or_else(Uuid::new_v4),
            message_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            ttl: self.ttl,
            max_callbacks: self.max_callbacks,
            extra: serde_json::Map::new(),
        }
    }
}

/// Parse an ISO-8601 duration of the restricted form this protocol uses
/// (`PT<seconds>S`, `PT<minutes>M`, `PT<hours>H`, or a combination such as
/// `P1D`), returning `None` for anything it cannot confidently parse —
/// callers should treat that as "no TTL bound" rather than fail closed,
/// since `ttl` is optional in the wire format.
pub fn parse_iso8601_duration(s: &str) -> Option<Duration> {
    let s = s.strip_prefix('P')?;
    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };

    let mut total = Duration::zero();
    total = total + parse_duration_component(date_part, 'D', |n| Duration::days(n));
    if let Some(t) = time_part {
        total = total + parse_duration_component(t, 'H', Duration::hours);
        total = total + parse_duration_component(t, 'M', Duration::minutes);
        total = total + parse_duration_component(t, 'S', Duration::seconds);
    }
    Some(total)
}

fn parse_duration_component(s: &str, unit: char, to_duration: impl Fn(i64) -> Duration) -> Duration {
    let mut remainder = s;
    let mut value = Duration::zero();
    while let Some(idx) = remainder.find(unit) {
        let digits: String = remainder[..idx].chars().rev().take_while(|c| c.is_ascii_digit()).collect();
        let digits: String = digits.chars().rev().collect();
        if let Ok(n) = digits.parse::<i64>() {
            value = value + to_duration(n);
        }
        remainder = &remainder[idx + 1..];
    }
    value
}

impl Context {
    /// `timestamp` must be within `[-5 min, +30 s]` of `now`.
    pub fn timestamp_is_fresh(&self, now: DateTime<Utc>) -> bool {
        let min = now - Duration::minutes(5);
        let max = now + Duration::seconds(30);
        self.timestamp >= min && self.timestamp <= max
    }

    /// `timestamp + ttl >= now`, when a `ttl` is present.
    pub fn ttl_not_expired(&self, now: DateTime<Utc>) -> bool {
        match &self.ttl {
            None => true,
            Some(ttl) => match parse_iso8601_duration(ttl) {
                Some(d) => self.timestamp + d >= now,
                None => true,
            },
        }
    }
}
