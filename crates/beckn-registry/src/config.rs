//! Registry service configuration, loaded from the environment: one
//! fallible lookup per field, defaults filling anything unset.

use beckn_crypto::signatures::Ed25519KeyPair;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub struct RegistryConfig {
    pub bind_addr: String,
    pub subscriber_id: String,
    pub unique_key_id: String,
    pub data_dir: Option<String>,
    pub signing_key: Ed25519KeyPair,
}

impl RegistryConfig {
    /// Reads `REGISTRY_BIND_ADDR`, `SUBSCRIBER_ID`, `REGISTRY_DATA_DIR`
    /// (RocksDB path; absent means in-memory) and `SIGNING_PRIVATE_KEY`
    /// (base64 Ed25519 seed, freshly generated if unset — fine for a dev
    /// run, fatal for a production one since every restart would change
    /// the registry's `ondc/vlookup` signing identity).
    pub fn from_env() -> Self {
        let bind_addr = env_or("REGISTRY_BIND_ADDR", "0.0.0.0:9000");
        let subscriber_id = env_or("SUBSCRIBER_ID", "registry.local");
        let unique_key_id = env_or("UNIQUE_KEY_ID", "registry-key-1");
        let data_dir = std::env::var("REGISTRY_DATA_DIR").ok();
        let signing_key = match std::env::var("SIGNING_PRIVATE_KEY") {
            Ok(seed_b64) => Ed25519KeyPair::from_seed_b64(&seed_b64).expect("SIGNING_PRIVATE_KEY must be a 32-byte base64 seed"),
            Err(_) => Ed25519KeyPair::generate(),
        };
        Self { bind_addr, subscriber_id, unique_key_id, data_dir, signing_key }
    }
}
