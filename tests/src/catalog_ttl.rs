//! §8 scenario 5: a catalog stored with a short TTL answers `search`
//! normally while fresh, then degrades to the minimal expired shape once
//! past its TTL.

#[cfg(test)]
mod tests {
    use beckn_catalog::{build_on_search_response, CatalogRepository, InMemoryCatalogRepository};
    use beckn_types::{Descriptor, Intent, Item, Price, Provider};
    use chrono::Duration;

    fn item(id: &str) -> Item {
        Item {
            id: id.into(),
            descriptor: Descriptor { name: Some("Organic Rice".into()), ..Default::default() },
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

    #[tokio::test]
    async fn catalog_answers_search_while_fresh_then_degrades_past_ttl() {
        let repo = InMemoryCatalogRepository::new();
        repo.store_catalog("bpp1", provider(), vec![item("i1")], Duration::seconds(5)).await.unwrap();

        let stored = repo.get("bpp1").await.unwrap().unwrap();
        let at_plus_one_second = stored.stored_at + Duration::seconds(1);
        let catalog = build_on_search_response(&stored, &Intent::default(), at_plus_one_second).unwrap();
        assert_eq!(catalog.providers.len(), 1);
        assert_eq!(catalog.providers[0].items[0].id, "i1");

        let at_plus_seven_seconds = stored.stored_at + Duration::seconds(7);
        let expired_catalog = build_on_search_response(&stored, &Intent::default(), at_plus_seven_seconds).unwrap();
        assert!(expired_catalog.providers.is_empty());
        assert_eq!(expired_catalog.exp, Some(stored.stored_at));
    }
}
