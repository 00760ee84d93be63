//! # Outbound port (driven side)
//!
//! The BAP engine signs with its own key but needs the *counterparty's*
//! public key to authenticate every inbound `on_*` callback. A deployed
//! BAP is a separate process from the registry, so this is a network
//! lookup, not an in-process repository call — kept behind a trait so
//! tests substitute a fixed table instead of a real registry.

use crate::domain::errors::BapError;

#[async_trait::async_trait]
pub trait RegistryLookup: Send + Sync {
    /// The base64 Ed25519 signing public key registered for
    /// `subscriber_id`, or `None` if the registry has no `SUBSCRIBED`
    /// record for it.
    async fn signing_public_key(&self, subscriber_id: &str) -> Result<Option<String>, BapError>;
}
