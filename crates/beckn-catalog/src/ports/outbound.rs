//! # Outbound port (driven side)
//!
//! Write access is provider-exclusive (§5: "writes from one provider
//! only"); reads are concurrent. A single `subscriber_id` key holds the
//! whole stored catalog plus its sibling update queue.

use beckn_types::{Item, Provider};
use chrono::Duration;

use crate::domain::errors::CatalogError;
use crate::domain::types::{CatalogUpdate, ItemPatch, StoredCatalog};

#[async_trait::async_trait]
pub trait CatalogRepository: Send + Sync {
    /// `storeCatalog`: stamps each item's `time.timestamp`, writes the
    /// blob, sets expiry to `2×ttl`.
    async fn store_catalog(&self, subscriber_id: &str, provider: Provider, items: Vec<Item>, ttl: Duration) -> Result<(), CatalogError>;

    /// `updateItem`: merges `patch` into the existing item, preserving
    /// the catalog's TTL.
    async fn update_item(&self, subscriber_id: &str, item_id: &str, patch: ItemPatch) -> Result<(), CatalogError>;

    /// `recordCatalogUpdate`: appends to the per-provider queue (cap
    /// 1000, oldest dropped) and applies the update to the stored
    /// catalog.
    async fn record_update(&self, subscriber_id: &str, update: CatalogUpdate) -> Result<(), CatalogError>;

    async fn get(&self, subscriber_id: &str) -> Result<Option<StoredCatalog>, CatalogError>;

    async fn pending_updates(&self, subscriber_id: &str) -> Result<Vec<CatalogUpdate>, CatalogError>;
}
