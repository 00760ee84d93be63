//! Subscriber registry: challenge-response onboarding, verified lookup,
//! and admin lifecycle (C5 / §4.4), plus the HTTP surface that fronts it.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

pub use adapters::InMemorySubscriberRepository;
#[cfg(feature = "rocksdb-store")]
pub use adapters::RocksDbSubscriberRepository;
pub use cache::LookupCache;
pub use config::RegistryConfig;
pub use domain::{
    apply_filter, on_subscribe, sign_ondc_response, subscribe, verify_ondc_signature, AdminAction, AuditAction,
    AuditEntry, LookupFilter, OnSubscribeRequest, OndcSearchParameters, OndcVlookupRequest, OndcVlookupResponse,
    PendingChallenge, RegistryError, SubscribeRequest, SubscribeResponse, SubscriberTypeKey, LOOKUP_CACHE_TTL_SECS,
    VALIDITY_PERIOD_DAYS,
};
pub use http::{router, RegistryState};
pub use ports::SubscriberRepository;
