//! # Webhook delivery
//!
//! The BAP-side push channel for callback data: `subscriber_id -> {url,
//! events[*]}`, matched on `event in events OR "*" in events`. Delivery is
//! at-least-once *intent* but the BAP itself never retries an HTTP
//! failure — a failed delivery is logged with `subscriber_id`/`event` for
//! out-of-band reprocessing (§5): log and drop, rather than retry, for
//! undeliverable events.

use dashmap::DashMap;
use serde_json::Value;
use tracing::warn;

use crate::dispatch::HttpDispatcher;

#[derive(Debug, Clone)]
pub struct WebhookRegistration {
    pub url: String,
    pub events: Vec<String>,
}

impl WebhookRegistration {
    fn matches(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event || e == "*")
    }
}

/// In-memory `subscriber_id -> registration` table. One registration per
/// subscriber; a later `POST /api/webhooks` call replaces the prior one.
#[derive(Default)]
pub struct WebhookRegistry {
    registrations: DashMap<String, WebhookRegistration>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, subscriber_id: impl Into<String>, registration: WebhookRegistration) {
        self.registrations.insert(subscriber_id.into(), registration);
    }

    pub fn get(&self, subscriber_id: &str) -> Option<WebhookRegistration> {
        self.registrations.get(subscriber_id).map(|r| r.clone())
    }

    /// Best-effort delivery: if no registration matches `event`, this is a
    /// no-op. A non-2xx/network failure is logged, never retried.
    pub async fn deliver(&self, dispatcher: &dyn HttpDispatcher, subscriber_id: &str, event: &str, payload: &Value) {
        let Some(registration) = self.get(subscriber_id) else { return };
        if !registration.matches(event) {
            return;
        }
        match dispatcher.post_json(&registration.url, &[], payload).await {
            Ok(resp) if resp.is_success() => {}
            Ok(resp) => {
                warn!(subscriber_id, event, status = resp.status, url = %registration.url, "webhook delivery rejected");
            }
            Err(err) => {
                warn!(subscriber_id, event, url = %registration.url, error = %err, "webhook delivery failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchResponse;
    use crate::errors::NetError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDispatcher {
        calls: Arc<AtomicUsize>,
        status: u16,
    }

    #[async_trait::async_trait]
    impl HttpDispatcher for CountingDispatcher {
        async fn post_json(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            _body: &Value,
        ) -> Result<DispatchResponse, NetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DispatchResponse { status: self.status, body: Value::Null })
        }
    }

    #[tokio::test]
    async fn delivers_on_exact_event_match() {
        let registry = WebhookRegistry::new();
        registry.register(
            "bap1",
            WebhookRegistration { url: "http://hook.example".into(), events: vec!["on_search".into()] },
        );
        let dispatcher = CountingDispatcher { calls: Arc::new(AtomicUsize::new(0)), status: 200 };
        registry.deliver(&dispatcher, "bap1", "on_search", &Value::Null).await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skips_delivery_on_non_matching_event() {
        let registry = WebhookRegistry::new();
        registry.register(
            "bap1",
            WebhookRegistration { url: "http://hook.example".into(), events: vec!["on_confirm".into()] },
        );
        let dispatcher = CountingDispatcher { calls: Arc::new(AtomicUsize::new(0)), status: 200 };
        registry.deliver(&dispatcher, "bap1", "on_search", &Value::Null).await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wildcard_matches_any_event() {
        let registry = WebhookRegistry::new();
        registry.register("bap1", WebhookRegistration { url: "http://hook.example".into(), events: vec!["*".into()] });
        let dispatcher = CountingDispatcher { calls: Arc::new(AtomicUsize::new(0)), status: 200 };
        registry.deliver(&dispatcher, "bap1", "on_anything", &Value::Null).await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_2xx_is_logged_not_retried() {
        let registry = WebhookRegistry::new();
        registry.register("bap1", WebhookRegistration { url: "http://hook.example".into(), events: vec!["*".into()] });
        let dispatcher = CountingDispatcher { calls: Arc::new(AtomicUsize::new(0)), status: 500 };
        registry.deliver(&dispatcher, "bap1", "on_search", &Value::Null).await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    }
}
