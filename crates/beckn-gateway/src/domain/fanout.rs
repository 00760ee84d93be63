//! # Matching & envelope construction for `search` fan-out (§4.5)
//!
//! Matching BPPs is the same filter `beckn-registry` already exposes for
//! `/lookup` — `SUBSCRIBED`, matching domain, matching city OR a
//! nationwide/active extension tuple — narrowed to `type=BPP`. The
//! gateway is a *consumer* of that filter, not a reimplementation of it.

use beckn_registry::{apply_filter, LookupFilter, SubscriberTypeKey};
use beckn_types::{Context, Envelope, Subscriber, SubscriberDomain};
use chrono::Utc;
use uuid::Uuid;

/// Every `SUBSCRIBED` BPP whose `(domain, city)` matches the incoming
/// `search` context, via the primary tuple or an active extension.
pub fn matching_bpps(subscribers: &[Subscriber], extensions: &[SubscriberDomain], context: &Context) -> Vec<Subscriber> {
    let filter = LookupFilter {
        subscriber_id: None,
        r#type: Some(SubscriberTypeKey::Bpp),
        domain: Some(context.domain.clone()),
        city: Some(context.city.clone()),
    };
    apply_filter(subscribers, extensions, &filter, Utc::now())
}

/// One outbound copy of a `search` envelope: the context is preserved
/// (same `transaction_id`, same `bap_id`/`bap_uri`) except for a freshly
/// minted `message_id` per BPP, so each fan-out leg is independently
/// deduplicable at the receiving BPP.
pub fn envelope_for_bpp(original: &Envelope) -> Envelope {
    let mut context = original.context.clone();
    context.message_id = Uuid::new_v4();
    context.timestamp = Utc::now();
    Envelope::new(context, original.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_types::{ContextBuilder, SubscriberStatus, SubscriberType};
    use chrono::Duration;
    use serde_json::json;

    fn bpp(id: &str, domain: &str, city: &str, status: SubscriberStatus) -> Subscriber {
        let now = Utc::now();
        Subscriber {
            subscriber_id: id.into(),
            subscriber_url: format!("https://{id}/beckn"),
            r#type: SubscriberType::Bpp,
            signing_public_key: "x".into(),
            encr_public_key: "y".into(),
            unique_key_id: "k1".into(),
            domain: domain.into(),
            city: city.into(),
            status,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
        }
    }

    fn search_context() -> Context {
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
            ttl: Some("PT30S".into()),
            max_callbacks: None,
        }
        .build()
    }

    #[test]
    fn matches_subscribed_bpps_in_domain_and_city_only() {
        let subs = vec![
            bpp("bpp1", "ONDC:RET10", "std:011", SubscriberStatus::Subscribed),
            bpp("bpp2", "ONDC:RET10", "std:080", SubscriberStatus::Subscribed),
            bpp("bpp3", "ONDC:RET10", "std:011", SubscriberStatus::Suspended),
        ];
        let ctx = search_context();
        let matches = matching_bpps(&subs, &[], &ctx);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].subscriber_id, "bpp1");
    }

    #[test]
    fn per_bpp_envelope_keeps_transaction_id_mints_fresh_message_id() {
        let ctx = search_context();
        let original = Envelope::new(ctx.clone(), json!({"intent": {}}));
        let copy = envelope_for_bpp(&original);
        assert_eq!(copy.context.transaction_id, ctx.transaction_id);
        assert_ne!(copy.context.message_id, ctx.message_id);
    }
}
