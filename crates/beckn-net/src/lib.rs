//! # Outbound dispatch
//!
//! Everything that leaves a node over HTTP funnels through this crate: the
//! gateway's bounded-retry fan-out to BPPs, the BAP/BPP's direct
//! request/callback POSTs, and best-effort webhook delivery. Signing
//! (`beckn-crypto`) happens before a call reaches here; this crate only
//! moves already-signed bytes over the wire.

pub mod dispatch;
pub mod errors;
pub mod retry;
pub mod webhook;

pub use dispatch::{DispatchResponse, HttpDispatcher, ReqwestDispatcher};
pub use errors::NetError;
pub use retry::post_with_backoff;
pub use webhook::{WebhookRegistration, WebhookRegistry};
