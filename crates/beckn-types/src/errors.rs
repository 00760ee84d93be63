//! # Error Taxonomy
//!
//! The five error kinds every Beckn participant in this workspace reports,
//! each owning a disjoint numeric code range. A `BecknError` is the single
//! currency passed between the domain layer and the HTTP adapter layer:
//! the adapter turns it into the wire `{type, code, message}` shape, never
//! the other way around.

use serde::Serialize;
use thiserror::Error;

/// A structured protocol error with a taxonomy kind and a numeric code
/// inside that kind's range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}/{code}: {message}")]
pub struct BecknError {
    pub kind: ErrorKind,
    pub code: u32,
    pub message: String,
}

/// The five error kinds, each owning a 10000-wide numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "CONTEXT-ERROR")]
    Context,
    #[serde(rename = "DOMAIN-ERROR")]
    Domain,
    #[serde(rename = "POLICY-ERROR")]
    Policy,
    #[serde(rename = "BUSINESS-ERROR")]
    Business,
    #[serde(rename = "TECHNICAL-ERROR")]
    Technical,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Context => "CONTEXT-ERROR",
            ErrorKind::Domain => "DOMAIN-ERROR",
            ErrorKind::Policy => "POLICY-ERROR",
            ErrorKind::Business => "BUSINESS-ERROR",
            ErrorKind::Technical => "TECHNICAL-ERROR",
        };
        f.write_str(s)
    }
}

/// Well-known codes named explicitly by the protocol contract. Codes not
/// listed here may still be constructed with [`BecknError::context`] etc.,
/// as long as they fall inside the kind's range.
pub mod codes {
    /// Malformed header, invalid UUID, missing required context field.
    pub const CONTEXT_MALFORMED: u32 = 10_000;
    /// Signature verification failed. `verify` never throws; this is the
    /// code every crypto failure collapses to at the HTTP boundary.
    pub const CONTEXT_SIGNATURE_INVALID: u32 = 10_001;
    /// Both v1.1 flat and v1.2 nested location/version fields are present
    /// and disagree.
    pub const CONTEXT_LOCATION_VERSION_MISMATCH: u32 = 10_002;
    /// Timestamp outside `[-5min, +30s]` of the receiver's clock.
    pub const CONTEXT_STALE_TIMESTAMP: u32 = 10_003;
    /// `timestamp + ttl < now`.
    pub const CONTEXT_TTL_EXPIRED: u32 = 10_004;
    /// Non-`search`/non-`on_*` action missing `bpp_id`/`bpp_uri`.
    pub const CONTEXT_MISSING_COUNTERPARTY: u32 = 10_005;

    /// Unknown domain.
    pub const DOMAIN_UNKNOWN_DOMAIN: u32 = 20_000;
    /// Unknown provider.
    pub const DOMAIN_UNKNOWN_PROVIDER: u32 = 20_001;
    /// Unknown item.
    pub const DOMAIN_UNKNOWN_ITEM: u32 = 20_002;
    /// Unknown grievance issue.
    pub const DOMAIN_UNKNOWN_ISSUE: u32 = 20_003;

    /// Duplicate `message_id`.
    pub const POLICY_DUPLICATE_MESSAGE: u32 = 30_000;
    /// Sender is not a `SUBSCRIBED` participant.
    pub const POLICY_UNAUTHORIZED: u32 = 30_001;
    /// Rate limit exceeded.
    pub const POLICY_RATE_LIMITED: u32 = 30_002;

    /// Invalid order state transition.
    pub const BUSINESS_INVALID_TRANSITION: u32 = 40_001;
    /// Cancellation rejected (e.g. unknown reason code).
    pub const BUSINESS_CANCELLATION_REJECTED: u32 = 40_002;
    /// Payment failure.
    pub const BUSINESS_PAYMENT_FAILED: u32 = 40_003;
    /// Rating value out of the 1-5 range.
    pub const BUSINESS_RATING_OUT_OF_RANGE: u32 = 40_004;
    /// Invalid grievance issue state transition.
    pub const BUSINESS_INVALID_ISSUE_TRANSITION: u32 = 40_005;

    /// Upstream call timed out.
    pub const TECHNICAL_UPSTREAM_TIMEOUT: u32 = 50_000;
    /// Database read/write failed.
    pub const TECHNICAL_DATABASE: u32 = 50_001;
    /// (De)serialization failed.
    pub const TECHNICAL_SERIALIZATION: u32 = 50_002;
}

impl BecknError {
    pub fn context(code: u32, message: impl Into<String>) -> Self {
        debug_assert!((10_000..20_000).contains(&code), "code {code} not in CONTEXT-ERROR range");
        Self { kind: ErrorKind::Context, code, message: message.into() }
    }

    pub fn domain(code: u32, message: impl Into<String>) -> Self {
        debug_assert!((20_000..30_000).contains(&code), "code {code} not in DOMAIN-ERROR range");
        Self { kind: ErrorKind::Domain, code, message: message.into() }
    }

    pub fn policy(code: u32, message: impl Into<String>) -> Self {
        debug_assert!((30_000..40_000).contains(&code), "code {code} not in POLICY-ERROR range");
        Self { kind: ErrorKind::Policy, code, message: message.into() }
    }

    pub fn business(code: u32, message: impl Into<String>) -> Self {
        debug_assert!((40_000..50_000).contains(&code), "code {code} not in BUSINESS-ERROR range");
        Self { kind: ErrorKind::Business, code, message: message.into() }
    }

    pub fn technical(code: u32, message: impl Into<String>) -> Self {
        debug_assert!((50_000..60_000).contains(&code), "code {code} not in TECHNICAL-ERROR range");
        Self { kind: ErrorKind::Technical, code, message: message.into() }
    }

    /// Signature/digest mismatch inside `verify`. Callers of `verify` never
    /// see a decode panic or a propagated crypto exception; this is the
    /// sole error value that boundary produces.
    pub fn signature_invalid() -> Self {
        Self::context(codes::CONTEXT_SIGNATURE_INVALID, "signature verification failed")
    }

    /// Render as the wire `{type, code, message}` error body.
    pub fn to_wire(&self) -> WireError {
        WireError { r#type: self.kind, code: self.code.to_string(), message: self.message.clone() }
    }
}

/// The `error` object carried in a Beckn `ACK`/`NACK` response.
#[derive(Debug, Clone, Serialize)]
pub struct WireError {
    pub r#type: ErrorKind,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_wire_taxonomy() {
        assert_eq!(ErrorKind::Context.to_string(), "CONTEXT-ERROR");
        assert_eq!(ErrorKind::Business.to_string(), "BUSINESS-ERROR");
    }

    #[test]
    fn signature_invalid_uses_fixed_code() {
        let err = BecknError::signature_invalid();
        assert_eq!(err.code, codes::CONTEXT_SIGNATURE_INVALID);
        assert_eq!(err.kind, ErrorKind::Context);
    }

    #[test]
    #[should_panic]
    fn constructing_out_of_range_code_panics_in_debug() {
        let _ = BecknError::business(codes::CONTEXT_MALFORMED, "wrong range");
    }
}
