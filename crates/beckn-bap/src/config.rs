//! BAP service configuration, read the same `std::env::var` + literal
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

pub struct BapConfig {
    pub bind_addr: String,
    pub subscriber_id: String,
    pub subscriber_url: String,
    pub unique_key_id: String,
    pub signing_key: Ed25519KeyPair,
    pub registry_url: String,
    pub gateway_url: String,
    pub request_timeout: Duration,
    pub beckn_core_version: String,
    pub country: String,
    pub default_city: String,
}

impl BapConfig {
    /// Reads `BAP_BIND_ADDR`, `SUBSCRIBER_ID`, `SUBSCRIBER_URL`,
    /// `UNIQUE_KEY_ID`, `SIGNING_PRIVATE_KEY`, `REGISTRY_URL`,
    /// `GATEWAY_URL`, `MAX_RESPONSE_TIME_MS`, `BECKN_CORE_VERSION`,
    /// `BECKN_COUNTRY`, `DEFAULT_CITY` per §6.
    pub fn from_env() -> Self {
        let signing_key = match std::env::var("SIGNING_PRIVATE_KEY") {
            Ok(seed_b64) => Ed25519KeyPair::from_seed_b64(&seed_b64).expect("SIGNING_PRIVATE_KEY must be a 32-byte base64 seed"),
            Err(_) => Ed25519KeyPair::generate(),
        };
        Self {
            bind_addr: env_or("BAP_BIND_ADDR", "0.0.0.0:9002"),
            subscriber_id: env_or("SUBSCRIBER_ID", "bap.local"),
            subscriber_url: env_or("SUBSCRIBER_URL", "https://bap.local/beckn"),
            unique_key_id: env_or("UNIQUE_KEY_ID", "bap-key-1"),
            signing_key,
            registry_url: env_or("REGISTRY_URL", "http://localhost:9000"),
            gateway_url: env_or("GATEWAY_URL", "http://localhost:9001"),
            request_timeout: Duration::from_millis(env_usize_or("MAX_RESPONSE_TIME_MS", 30_000) as u64),
            beckn_core_version: env_or("BECKN_CORE_VERSION", "1.2.0"),
            country: env_or("BECKN_COUNTRY", "IND"),
            default_city: env_or("DEFAULT_CITY", "std:011"),
        }
    }
}
