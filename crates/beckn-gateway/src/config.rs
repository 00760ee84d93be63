//! Gateway service configuration, read the same `std::env::var` + literal
//! default way every service config in this workspace is (§6), mirroring
//! `beckn_registry::RegistryConfig::from_env`.

use std::time::Duration;

use beckn_crypto::signatures::Ed25519KeyPair;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize_or(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

pub struct GatewayConfig {
    pub bind_addr: String,
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub signing_key: Ed25519KeyPair,
    /// `GATEWAY_FANOUT_WORKERS` (default 16) — the fixed worker pool size
    /// fanning `search` out to matching BPPs (§4.5, SPEC_FULL §4.5).
    pub fanout_workers: usize,
    pub fanout_queue_capacity: usize,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let bind_addr = env_or("GATEWAY_BIND_ADDR", "0.0.0.0:9001");
        let subscriber_id = env_or("SUBSCRIBER_ID", "gateway.local");
        let unique_key_id = env_or("UNIQUE_KEY_ID", "gateway-key-1");
        let signing_key = match std::env::var("SIGNING_PRIVATE_KEY") {
            Ok(seed_b64) => Ed25519KeyPair::from_seed_b64(&seed_b64).expect("SIGNING_PRIVATE_KEY must be a 32-byte base64 seed"),
            Err(_) => Ed25519KeyPair::generate(),
        };
        let fanout_workers = env_usize_or("GATEWAY_FANOUT_WORKERS", 16);
        let fanout_queue_capacity = env_usize_or("GATEWAY_FANOUT_QUEUE_CAPACITY", 1024);
        let request_timeout_ms = env_usize_or("MAX_RESPONSE_TIME_MS", 30_000);
        Self {
            bind_addr,
            subscriber_id,
            unique_key_id,
            signing_key,
            fanout_workers,
            fanout_queue_capacity,
            request_timeout: Duration::from_millis(request_timeout_ms as u64),
        }
    }
}
