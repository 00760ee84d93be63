//! # Stored catalog & incremental update vocabulary

use beckn_types::{Item, Provider};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TTL: Duration = Duration::hours(1);

/// A provider's catalog as persisted by one BPP, stamped with when it was
/// stored and the TTL it was stored with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCatalog {
    pub provider: Provider,
    pub items: Vec<Item>,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl StoredCatalog {
    /// Past this point (`2×ttl`), the record itself is gone — the grace
    /// window between `ttl` and `2×ttl` only serves stale-but-present
    /// reads (§3: "storage key must expire at 2×ttl").
    pub fn hard_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.ttl + self.ttl
    }

    pub fn soft_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    Add,
    Remove,
    Update,
    PriceUpdate,
    AvailabilityUpdate,
}

/// One entry in a provider's incremental-update queue (capped at 1000,
/// oldest dropped first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUpdate {
    pub kind: UpdateKind,
    pub item_id: String,
    pub item: Option<Item>,
    pub timestamp: DateTime<Utc>,
}

pub const MAX_PENDING_UPDATES: usize = 1000;

/// A partial update to one catalog item; `None` fields are left
/// untouched. `time.timestamp` is always re-stamped to `now` on apply,
/// regardless of what's supplied here (§4.8: "stamps `time.timestamp =
/// now`").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub descriptor: Option<beckn_types::Descriptor>,
    pub price: Option<beckn_types::Price>,
    pub category_id: Option<String>,
    pub fulfillment_id: Option<String>,
    pub quantity: Option<beckn_types::Quantity>,
    pub tags: Option<Vec<beckn_types::TagGroup>>,
}

impl ItemPatch {
    pub fn apply(self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(descriptor) = self.descriptor {
            item.descriptor = descriptor;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if self.category_id.is_some() {
            item.category_id = self.category_id;
        }
        if self.fulfillment_id.is_some() {
            item.fulfillment_id = self.fulfillment_id;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = Some(quantity);
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        item.time = Some(beckn_types::ItemTime { timestamp: now });
    }
}
