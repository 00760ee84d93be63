//! # Bounded fan-out worker pool (§4.5, §5)
//!
//! One bounded `tokio::sync::mpsc` channel, drained by a fixed pool of
//! spawned workers, one job per `(BPP, search envelope)` pair.
//! `HttpDispatcher::post_json` already does the per-request work; this
//! module only owns queueing and worker lifecycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use beckn_crypto::auth_header::build_auth_header;
use beckn_crypto::signatures::Ed25519KeyPair;
use beckn_net::{post_with_backoff, HttpDispatcher};
use beckn_types::Envelope;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

/// One piece of outbound work: an envelope already addressed and
/// deadline-bound, waiting only for a worker slot.
pub struct FanoutJob {
    pub target_url: String,
    pub envelope: Envelope,
    pub deadline: Instant,
}

/// Shared identity the pool signs every outbound leg with — this is
/// always the gateway's own key (§4.5: "signed with the gateway's own
/// key"), never the originating BAP's.
pub struct GatewayIdentity {
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub signing_key: Ed25519KeyPair,
}

/// Spawns `worker_count` tasks draining `receiver`, returning the sender
/// half callers enqueue jobs on. Workers run until the sender side (and
/// every clone of it) is dropped.
pub fn spawn_workers(
    worker_count: usize,
    dispatcher: Arc<dyn HttpDispatcher>,
    identity: Arc<GatewayIdentity>,
    queue_capacity: usize,
) -> mpsc::Sender<FanoutJob> {
    let (tx, rx) = mpsc::channel::<FanoutJob>(queue_capacity);
    let rx = Arc::new(Mutex::new(rx));

    for worker_id in 0..worker_count {
        let rx = rx.clone();
        let dispatcher = dispatcher.clone();
        let identity = identity.clone();
        tokio::spawn(async move {
            loop {
                let job = {
                    let mut guard = rx.lock().await;
                    guard.recv().await
                };
                let Some(job) = job else { break };
                run_job(worker_id, &dispatcher, &identity, job).await;
            }
        });
    }

    tx
}

async fn run_job(worker_id: usize, dispatcher: &Arc<dyn HttpDispatcher>, identity: &GatewayIdentity, job: FanoutJob) {
    let body = match serde_json::to_value(&job.envelope) {
        Ok(v) => v,
        Err(e) => {
            error!(worker_id, error = %e, "failed to serialize fan-out envelope");
            return;
        }
    };
    let signature = match build_auth_header(&identity.subscriber_id, &identity.unique_key_id, &identity.signing_key, &body) {
        Ok(h) => h,
        Err(e) => {
            error!(worker_id, error = %e, "failed to sign fan-out envelope");
            return;
        }
    };
    // Both headers carry the gateway's own signature: there is no
    // original-sender signature left to preserve once `message_id` has
    // been re-minted per §4.5, and `X-Gateway-Authorization` still lets a
    // receiver distinguish gateway-relayed traffic from a direct peer.
    let headers = vec![
        ("Authorization".to_string(), signature.clone()),
        ("X-Gateway-Authorization".to_string(), signature),
    ];

    match post_with_backoff(dispatcher.as_ref(), &job.target_url, &headers, &body, job.deadline).await {
        Ok(resp) if resp.is_success() => {
            info!(worker_id, url = %job.target_url, transaction_id = %job.envelope.context.transaction_id, "fan-out delivered");
        }
        Ok(resp) => {
            error!(worker_id, url = %job.target_url, status = resp.status, "fan-out target rejected delivery");
        }
        Err(err) => {
            error!(worker_id, url = %job.target_url, error = %err, "fan-out abandoned after retries/deadline");
        }
    }
}

pub fn deadline_from_ttl(ttl: Option<&str>, default: Duration) -> Instant {
    let duration = ttl
        .and_then(beckn_types::parse_iso8601_duration)
        .and_then(|d| d.to_std().ok())
        .unwrap_or(default);
    Instant::now() + duration
}

#[cfg(test)]
mod tests {
    use super::*;
    use beckn_crypto::signatures::Ed25519KeyPair;
    use beckn_net::{DispatchResponse, NetError};
    use beckn_types::ContextBuilder;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDispatcher {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl HttpDispatcher for CountingDispatcher {
        async fn post_json(&self, _url: &str, headers: &[(String, String)], _body: &Value) -> Result<DispatchResponse, NetError> {
            assert!(headers.iter().any(|(k, _)| k == "X-Gateway-Authorization"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DispatchResponse { status: 200, body: Value::Null })
        }
    }

    fn envelope() -> Envelope {
        let ctx = ContextBuilder {
            domain: "ONDC:RET10".into(),
            country: "IND".into(),
            city: "std:011".into(),
            action: "search".into(),
            core_version: "1.2.0".into(),
            bap_id: "bap1".into(),
            bap_uri: "https://bap1.example.com".into(),
            bpp_id: None,
            bpp_uri: None,
            transaction_id: None,
            ttl: Some("PT30S".into()),
            max_callbacks: None,
        }
        .build();
        Envelope::new(ctx, serde_json::json!({"intent": {}}))
    }

    #[tokio::test]
    async fn enqueued_job_is_dispatched_with_gateway_signature() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher: Arc<dyn HttpDispatcher> = Arc::new(CountingDispatcher { calls: calls.clone() });
        let identity = Arc::new(GatewayIdentity {
            subscriber_id: "gateway.local".into(),
            unique_key_id: "gw-key-1".into(),
            signing_key: Ed25519KeyPair::generate(),
        });
        let tx = spawn_workers(2, dispatcher, identity, 16);
        tx.send(FanoutJob { target_url: "https://bpp1.example.com/search".into(), envelope: envelope(), deadline: Instant::now() + Duration::from_secs(5) })
            .await
            .unwrap();
        drop(tx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_ttl_falls_back_to_default() {
        let deadline = deadline_from_ttl(None, Duration::from_secs(30));
        assert!(deadline > Instant::now() + Duration::from_secs(29));
    }
}
