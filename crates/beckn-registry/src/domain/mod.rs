pub mod admin;
pub mod audit;
pub mod errors;
pub mod lookup;
pub mod ondc;
pub mod subscription;
pub mod types;

pub use admin::AdminAction;
pub use audit::{AuditAction, AuditEntry};
pub use errors::RegistryError;
pub use lookup::apply_filter;
pub use ondc::{sign_ondc_response, verify_ondc_signature, OndcSearchParameters, OndcVlookupRequest, OndcVlookupResponse};
pub use subscription::{on_subscribe, subscribe};
pub use types::{LookupFilter, OnSubscribeRequest, PendingChallenge, SubscribeRequest, SubscribeResponse, SubscriberTypeKey, LOOKUP_CACHE_TTL_SECS, VALIDITY_PERIOD_DAYS};
