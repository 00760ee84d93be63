//! Registry lookup over the wire: `POST {registry_url}/lookup
//! {subscriber_id}`, the same unauthenticated projection every Beckn
//! participant is entitled to read (§4.4).

use std::sync::Arc;

use beckn_net::HttpDispatcher;
use beckn_types::{codes, Subscriber};

use crate::domain::errors::BapError;
use crate::ports::outbound::RegistryLookup;

pub struct HttpRegistryLookup {
    dispatcher: Arc<dyn HttpDispatcher>,
    registry_url: String,
}

impl HttpRegistryLookup {
    pub fn new(dispatcher: Arc<dyn HttpDispatcher>, registry_url: impl Into<String>) -> Self {
        Self { dispatcher, registry_url: registry_url.into() }
    }
}

#[async_trait::async_trait]
impl RegistryLookup for HttpRegistryLookup {
    async fn signing_public_key(&self, subscriber_id: &str) -> Result<Option<String>, BapError> {
        let url = format!("{}/lookup", self.registry_url);
        let body = serde_json::json!({ "subscriber_id": subscriber_id });
        let resp = self
            .dispatcher
            .post_json(&url, &[], &body)
            .await
            .map_err(|e| BapError::Beckn(beckn_types::BecknError::technical(codes::TECHNICAL_UPSTREAM_TIMEOUT, e.to_string())))?;
        let subscribers: Vec<Subscriber> = serde_json::from_value(resp.body)
            .map_err(|e| BapError::Beckn(beckn_types::BecknError::technical(codes::TECHNICAL_SERIALIZATION, e.to_string())))?;
        Ok(subscribers.into_iter().next().map(|s| s.signing_public_key))
    }
}
