//! Broadcast gateway (C6, §4.5): authenticated `search` fan-out to every
//! matching `SUBSCRIBED` BPP and `on_search` forwarding back to the
//! originating BAP, fronted by the same axum/tower surface every other
//! service in this workspace exposes.

pub mod config;
pub mod domain;
pub mod http;
pub mod worker;

pub use config::GatewayConfig;
pub use domain::{envelope_for_bpp, matching_bpps, GatewayError};
pub use http::{router, GatewayState};
pub use worker::{deadline_from_ttl, spawn_workers, FanoutJob, GatewayIdentity};
