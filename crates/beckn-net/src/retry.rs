//! # Bounded-retry dispatch
//!
//! The gateway's only retrying outbound path (§4.5): up to 3 attempts with
//! exponential backoff, abandoned once the message's `ttl` deadline passes.
//! Every other outbound caller in the network (BAP/BPP request dispatch,
//! webhook delivery) uses [`crate::dispatch::HttpDispatcher::post_json`]
//! directly and does not retry — at-most-once delivery plus the `/status`
//! poll/webhook is how those failures surface instead.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::warn;

use crate::dispatch::{DispatchResponse, HttpDispatcher};
use crate::errors::NetError;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(200);

/// POST with exponential backoff (200ms, 400ms, 800ms, ...), stopping at
/// whichever comes first: `MAX_ATTEMPTS` attempts or `deadline`.
pub async fn post_with_backoff(
    dispatcher: &dyn HttpDispatcher,
    url: &str,
    headers: &[(String, String)],
    body: &Value,
    deadline: Instant,
) -> Result<DispatchResponse, NetError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        if Instant::now() >= deadline {
            return Err(NetError::Timeout(url.to_string()));
        }
        match dispatcher.post_json(url, headers, body).await {
            Ok(resp) if resp.is_success() => return Ok(resp),
            Ok(resp) => {
                warn!(url, status = resp.status, attempt, "non-2xx response from gateway fan-out target");
                if attempt >= MAX_ATTEMPTS {
                    return Err(NetError::RetriesExhausted(url.to_string()));
                }
            }
            Err(err) => {
                warn!(url, attempt, error = %err, "gateway fan-out dispatch failed");
                if attempt >= MAX_ATTEMPTS {
                    return Err(NetError::RetriesExhausted(url.to_string()));
                }
            }
        }
        let backoff = BASE_BACKOFF * 2u32.pow(attempt - 1);
        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::sleep(backoff.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FlakyDispatcher {
        calls: Arc<AtomicU32>,
        succeed_on: u32,
    }

    #[async_trait::async_trait]
    impl HttpDispatcher for FlakyDispatcher {
        async fn post_json(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            _body: &Value,
        ) -> Result<DispatchResponse, NetError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.succeed_on {
                Ok(DispatchResponse { status: 200, body: Value::Null })
            } else {
                Ok(DispatchResponse { status: 503, body: Value::Null })
            }
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let dispatcher = FlakyDispatcher { calls: Arc::new(AtomicU32::new(0)), succeed_on: 2 };
        let deadline = Instant::now() + Duration::from_secs(5);
        let resp = post_with_backoff(&dispatcher, "http://bpp.example/search", &[], &Value::Null, deadline)
            .await
            .unwrap();
        assert!(resp.is_success());
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let dispatcher = FlakyDispatcher { calls: Arc::new(AtomicU32::new(0)), succeed_on: 100 };
        let deadline = Instant::now() + Duration::from_secs(5);
        let result = post_with_backoff(&dispatcher, "http://bpp.example/search", &[], &Value::Null, deadline).await;
        assert!(matches!(result, Err(NetError::RetriesExhausted(_))));
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn abandons_past_deadline() {
        let dispatcher = FlakyDispatcher { calls: Arc::new(AtomicU32::new(0)), succeed_on: 100 };
        let deadline = Instant::now();
        let result = post_with_backoff(&dispatcher, "http://bpp.example/search", &[], &Value::Null, deadline).await;
        assert!(matches!(result, Err(NetError::Timeout(_))));
    }
}
