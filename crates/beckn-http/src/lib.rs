//! Shared axum plumbing for every Beckn network engine service: error
//! mapping, the common middleware stack, and `/healthz`.

pub mod error;
pub mod healthz;
pub mod middleware;

pub use error::{ack_response, ApiError};
pub use healthz::healthz;
