//! §8 scenario 6: after updating one item, an incremental `search`
//! filtered by `catalog_inc.timestamp` returns only the item touched
//! since that watermark.

#[cfg(test)]
mod tests {
    use beckn_catalog::{build_on_search_response, CatalogRepository, InMemoryCatalogRepository, ItemPatch};
    use beckn_types::{Descriptor, Intent, Item, Price, Provider, Tag, TagGroup};
    use chrono::Duration;

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.into(),
            descriptor: Descriptor { name: Some(name.into()), ..Default::default() },
            price: Price { currency: "INR".into(), value: "100".into() },
            category_id: Some("grocery".into()),
            fulfillment_id: None,
            quantity: None,
            time: None,
            tags: vec![],
        }
    }

    fn provider() -> Provider {
        Provider { id: "p1".into(), descriptor: Default::default(), items: vec![], fulfillments: vec![] }
    }

    fn incremental_since(ts: chrono::DateTime<chrono::Utc>) -> Intent {
        Intent {
            tags: vec![TagGroup { code: "catalog_inc".into(), list: vec![Tag { code: "timestamp".into(), value: ts.to_rfc3339() }] }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn updating_one_item_surfaces_only_that_item_to_an_incremental_search() {
        let repo = InMemoryCatalogRepository::new();
        repo.store_catalog("bpp1", provider(), vec![item("i1", "Organic Rice"), item("i2", "Steel Pan")], Duration::hours(1))
            .await
            .unwrap();

        // Captured after the initial store (both items stamped with the same
        // `stored_at`) and before the update below, so only the patched item
        // ends up newer than it.
        let watermark = chrono::Utc::now();

        repo.update_item(
            "bpp1",
            "i1",
            ItemPatch { price: Some(Price { currency: "INR".into(), value: "90".into() }), ..Default::default() },
        )
        .await
        .unwrap();

        // The untouched item i2 still predates the watermark; the patched
        // item i1 was re-stamped to "now" by `ItemPatch::apply` and so is
        // newer than it.
        let stored = repo.get("bpp1").await.unwrap().unwrap();
        let catalog = build_on_search_response(&stored, &incremental_since(watermark), chrono::Utc::now()).unwrap();
        assert_eq!(catalog.providers[0].items.len(), 1);
        assert_eq!(catalog.providers[0].items[0].id, "i1");
    }

    #[tokio::test]
    async fn incremental_search_with_no_items_newer_than_watermark_returns_none() {
        let repo = InMemoryCatalogRepository::new();
        repo.store_catalog("bpp1", provider(), vec![item("i1", "Organic Rice")], Duration::hours(1)).await.unwrap();

        let far_future = chrono::Utc::now() + Duration::hours(1);
        let stored = repo.get("bpp1").await.unwrap().unwrap();
        assert!(build_on_search_response(&stored, &incremental_since(far_future), chrono::Utc::now()).is_none());
    }
}
