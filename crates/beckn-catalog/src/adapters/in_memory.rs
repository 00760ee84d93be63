//! In-process catalog store keyed by `subscriber_id`, with a sibling
//! capped update queue per provider.

use std::collections::VecDeque;

use beckn_types::{Item, Provider};
use chrono::{Duration, Utc};
use dashmap::DashMap;

use crate::domain::errors::CatalogError;
use crate::domain::types::{CatalogUpdate, ItemPatch, StoredCatalog, UpdateKind, MAX_PENDING_UPDATES};
use crate::ports::outbound::CatalogRepository;

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    catalogs: DashMap<String, StoredCatalog>,
    updates: DashMap<String, VecDeque<CatalogUpdate>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn store_catalog(&self, subscriber_id: &str, provider: Provider, mut items: Vec<Item>, ttl: Duration) -> Result<(), CatalogError> {
        let now = Utc::now();
        for item in &mut items {
            item.time = Some(beckn_types::ItemTime { timestamp: now });
        }
        self.catalogs.insert(subscriber_id.to_string(), StoredCatalog { provider, items, stored_at: now, ttl });
        Ok(())
    }

    async fn update_item(&self, subscriber_id: &str, item_id: &str, patch: ItemPatch) -> Result<(), CatalogError> {
        let mut entry = self
            .catalogs
            .get_mut(subscriber_id)
            .ok_or_else(|| CatalogError::NotFound(subscriber_id.to_string()))?;
        let item = entry
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CatalogError::ItemNotFound { subscriber_id: subscriber_id.to_string(), item_id: item_id.to_string() })?;
        patch.apply(item, Utc::now());
        Ok(())
    }

    async fn record_update(&self, subscriber_id: &str, update: CatalogUpdate) -> Result<(), CatalogError> {
        {
            let mut queue = self.updates.entry(subscriber_id.to_string()).or_default();
            queue.push_back(update.clone());
            while queue.len() > MAX_PENDING_UPDATES {
                queue.pop_front();
            }
        }
        self.apply_update(subscriber_id, update)
    }

    async fn get(&self, subscriber_id: &str) -> Result<Option<StoredCatalog>, CatalogError> {
        let Some(catalog) = self.catalogs.get(subscriber_id).map(|c| c.clone()) else {
            return Ok(None);
        };
        if catalog.hard_expired(Utc::now()) {
            self.catalogs.remove(subscriber_id);
            return Ok(None);
        }
        Ok(Some(catalog))
    }

    async fn pending_updates(&self, subscriber_id: &str) -> Result<Vec<CatalogUpdate>, CatalogError> {
        Ok(self.updates.get(subscriber_id).map(|q| q.iter().cloned().collect()).unwrap_or_default())
    }
}

impl InMemoryCatalogRepository {
    fn apply_update(&self, subscriber_id: &str, update: CatalogUpdate) -> Result<(), CatalogError> {
        let Some(mut entry) = self.catalogs.get_mut(subscriber_id) else { return Ok(()) };
        match update.kind {
            UpdateKind::Remove => {
                entry.items.retain(|i| i.id != update.item_id);
            }
            UpdateKind::Add => {
                if let Some(item) = update.item {
                    entry.items.retain(|i| i.id != update.item_id);
                    entry.items.push(item);
                }
            }
            UpdateKind::Update | UpdateKind::PriceUpdate | UpdateKind::AvailabilityUpdate => {
                if let Some(new_item) = update.item {
                    if let Some(existing) = entry.items.iter_mut().find(|i| i.id == update.item_id) {
                        *existing = new_item;
                    } else {
                        entry.items.push(new_item);
                    }
                }
            }
        }
        Ok(())
    }
}
