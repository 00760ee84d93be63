//! Buyer application platform engine (C7, §4.6): the simplified outbound
//! `/api/<action>` surface a developer integrates against, the signed
//! dispatch it produces, and the inbound `/on_*` callback router that
//! projects BAP-side state and fans callbacks out to registered webhooks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

pub use adapters::HttpRegistryLookup;
pub use config::BapConfig;
pub use domain::{
    ApiAckResponse, BapError, CallbackProjection, OrderStatusResponse, OutboundAction, OutboundApiRequest,
    ProjectionStore, SearchApiRequest, WebhookRegistrationRequest,
};
pub use http::{router, BapState};
pub use ports::RegistryLookup;
