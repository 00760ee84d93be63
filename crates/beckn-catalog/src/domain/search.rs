//! # `buildOnSearchResponse` (§4.8)

use beckn_types::{Catalog, Intent, Item, Provider};
use chrono::{DateTime, Utc};

use crate::domain::types::StoredCatalog;

/// Build the `on_search` catalog response for one provider's stored
/// catalog against a buyer's `intent`. Returns `None` when there is
/// nothing to send: no catalog at all, or an incremental-sync request
/// that matched no item.
pub fn build_on_search_response(stored: &StoredCatalog, intent: &Intent, now: DateTime<Utc>) -> Option<Catalog> {
    if stored.soft_expired(now) {
        return Some(Catalog { providers: vec![], exp: Some(stored.stored_at) });
    }

    if let Some(provider_id) = &intent.provider_id {
        if provider_id != &stored.provider.id {
            return Some(Catalog { providers: vec![], exp: Some(stored.stored_at + stored.ttl) });
        }
    }

    let incremental_since = intent.incremental_since();
    let is_incremental = incremental_since.is_some();

    let filtered: Vec<Item> = stored
        .items
        .iter()
        .filter(|item| matches_descriptor(item, intent))
        .filter(|item| matches_category(item, intent))
        .filter(|item| matches_fulfillment_type(item, intent, &stored.provider))
        .filter(|item| matches_price_range(item, intent))
        .filter(|item| matches_tags(item, intent))
        .filter(|item| matches_incremental(item, incremental_since))
        .cloned()
        .collect();

    if is_incremental && filtered.is_empty() {
        return None;
    }

    let mut provider = stored.provider.clone();
    provider.items = filtered;

    Some(Catalog { providers: vec![provider], exp: Some(stored.stored_at + stored.ttl) })
}

fn matches_descriptor(item: &Item, intent: &Intent) -> bool {
    let Some(descriptor) = intent.descriptor.as_ref().and_then(|d| d.name.as_ref()) else { return true };
    let needle = descriptor.to_lowercase();
    let name = item.descriptor.name.as_deref().unwrap_or_default().to_lowercase();
    let short_desc = item.descriptor.short_desc.as_deref().unwrap_or_default().to_lowercase();
    name.contains(&needle) || short_desc.contains(&needle)
}

fn matches_category(item: &Item, intent: &Intent) -> bool {
    match &intent.category_id {
        Some(category_id) => item.category_id.as_deref() == Some(category_id.as_str()),
        None => true,
    }
}

fn matches_fulfillment_type(item: &Item, intent: &Intent, provider: &Provider) -> bool {
    let Some(fulfillment_type) = &intent.fulfillment_type else { return true };
    let Some(fulfillment_id) = &item.fulfillment_id else { return true };
    provider
        .fulfillments
        .iter()
        .find(|f| &f.id == fulfillment_id)
        .map(|f| f.r#type.as_deref() == Some(fulfillment_type.as_str()))
        .unwrap_or(true)
}

fn matches_price_range(item: &Item, intent: &Intent) -> bool {
    let Some(value) = item.price.value_as_f64() else { return true };
    if let Some(min) = intent.price_min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = intent.price_max {
        if value > max {
            return false;
        }
    }
    true
}

fn matches_tags(item: &Item, intent: &Intent) -> bool {
    for group in intent.tags.iter().filter(|g| g.code != "catalog_inc") {
        let item_group = item.tags.iter().find(|g| g.code == group.code);
        let Some(item_group) = item_group else { return false };
        let any_match = group.list.iter().any(|wanted| item_group.list.iter().any(|have| have.value == wanted.value));
        if !any_match {
            return false;
        }
    }
    true
}

fn matches_incremental(item: &Item, since: Option<DateTime<Utc>>) -> bool {
    match since {
        None => true,
        Some(since) => match item.time.as_ref() {
            Some(t) => t.timestamp > since,
            None => true,
        },
    }
}
