//! A fixed subscriber_id -> public_key table, used by tests in place of a
//! real registry round trip.

use dashmap::DashMap;

use crate::domain::errors::BapError;
use crate::ports::outbound::RegistryLookup;

#[derive(Default)]
pub struct StaticRegistryLookup {
    keys: DashMap<String, String>,
}

impl StaticRegistryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscriber_id: impl Into<String>, signing_public_key: impl Into<String>) {
        self.keys.insert(subscriber_id.into(), signing_public_key.into());
    }
}

#[async_trait::async_trait]
impl RegistryLookup for StaticRegistryLookup {
    async fn signing_public_key(&self, subscriber_id: &str) -> Result<Option<String>, BapError> {
        Ok(self.keys.get(subscriber_id).map(|v| v.clone()))
    }
}
