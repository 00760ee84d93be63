//! # Context validation
//!
//! The shape-level invariants (both flat and nested location agree, non-
//! `search` actions carry a counterparty) are already enforced by
//! [`beckn_types::Context`]'s `TryFrom` boundary — a `Context` value in
//! hand has already survived those. What's left, and what this module
//! checks, is everything that depends on wall-clock time or on the id
//! actually being a v4 UUID: a producer can construct a structurally
//! valid `ContextWire` with a v1 UUID or a stale timestamp, and neither
//! of those is a parse-time concern.

use beckn_types::{codes, BecknError, Context};
use chrono::Utc;
use uuid::Uuid;

/// Run every §3 invariant that needs the current time or UUID version.
/// Dedup is a separate, later concern — see [`crate::dedup::MessageDedup`]
/// — since a duplicate message is still a *valid* context, just one this
/// receiver has already routed.
pub fn validate(context: &Context) -> Result<(), BecknError> {
    validate_uuid_v4("transaction_id", context.transaction_id)?;
    validate_uuid_v4("message_id", context.message_id)?;

    let now = Utc::now();
    if !context.timestamp_is_fresh(now) {
        return Err(BecknError::context(
            codes::CONTEXT_STALE_TIMESTAMP,
            format!("timestamp {} is outside [-5min, +30s] of receiver clock", context.timestamp),
        ));
    }
    if !context.ttl_not_expired(now) {
        return Err(BecknError::context(codes::CONTEXT_TTL_EXPIRED, "timestamp + ttl < now"));
    }

    Ok(())
}

fn validate_uuid_v4(field: &str, id: Uuid) -> Result<(), BecknError> {
    if id.get_version_num() != 4 {
        return Err(BecknError::context(codes::CONTEXT_MALFORMED, format!("{field} is not a valid v4 UUID")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_types::ContextBuilder;

    fn valid_context() -> Context {
        ContextBuilder {
            domain: "ONDC:RET10".into(),
            country: "IND".into(),
            city: "std:011".into(),
            action: "search".into(),
            core_version: "1.2.0".into(),
            bap_id: "bap1.example.com".into(),
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
    fn freshly_built_context_is_valid() {
        assert!(validate(&valid_context()).is_ok());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let mut ctx = valid_context();
        ctx.timestamp = Utc::now() - chrono::Duration::minutes(10);
        let err = validate(&ctx).unwrap_err();
        assert_eq!(err.code, codes::CONTEXT_STALE_TIMESTAMP);
    }

    #[test]
    fn expired_ttl_is_rejected() {
        let mut ctx = valid_context();
        ctx.timestamp = Utc::now() - chrono::Duration::minutes(2);
        ctx.ttl = Some("PT30S".into());
        let err = validate(&ctx).unwrap_err();
        assert_eq!(err.code, codes::CONTEXT_TTL_EXPIRED);
    }

    #[test]
    fn non_v4_uuid_is_rejected() {
        let mut ctx = valid_context();
        ctx.message_id = Uuid::nil();
        let err = validate(&ctx).unwrap_err();
        assert_eq!(err.code, codes::CONTEXT_MALFORMED);
    }
}
