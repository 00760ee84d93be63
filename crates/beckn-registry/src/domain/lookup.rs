//! `/lookup`, `/vlookup` filtering (§4.4): `SUBSCRIBED`-only,
//! validity-clamped, filter-matched.

use beckn_types::{Subscriber, SubscriberDomain};
use chrono::{DateTime, Utc};

use crate::domain::types::LookupFilter;

pub fn apply_filter(subscribers: &[Subscriber], extensions: &[SubscriberDomain], filter: &LookupFilter, now: DateTime<Utc>) -> Vec<Subscriber> {
    subscribers
        .iter()
        .filter(|s| s.is_lookup_eligible(now))
        .filter(|s| filter.subscriber_id.as_deref().is_none_or(|id| id == s.subscriber_id))
        .filter(|s| filter.r#type.is_none_or(|t| t == s.r#type.into()))
        .filter(|s| s.matches(filter.domain.as_deref(), filter.city.as_deref(), extensions))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_types::SubscriberStatus;
    use chrono::Duration;

    fn sub(id: &str, status: SubscriberStatus) -> Subscriber {
        let now = Utc::now();
        Subscriber {
            subscriber_id: id.into(),
            subscriber_url: format!("https://{id}"),
            r#type: beckn_types::SubscriberType::Bpp,
            signing_public_key: "x".into(),
            encr_public_key: "y".into(),
            unique_key_id: "k1".into(),
            domain: "ONDC:RET10".into(),
            city: "std:011".into(),
            status,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
        }
    }

    #[test]
    fn excludes_non_subscribed_records() {
        let subs = vec![sub("a", SubscriberStatus::Subscribed), sub("b", SubscriberStatus::Suspended)];
        let out = apply_filter(&subs, &[], &LookupFilter::default(), Utc::now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subscriber_id, "a");
    }

    #[test]
    fn filters_by_subscriber_id() {
        let subs = vec![sub("a", SubscriberStatus::Subscribed), sub("b", SubscriberStatus::Subscribed)];
        let filter = LookupFilter { subscriber_id: Some("b".into()), ..Default::default() };
        let out = apply_filter(&subs, &[], &filter, Utc::now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subscriber_id, "b");
    }
}
