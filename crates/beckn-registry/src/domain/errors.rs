use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("subscriber '{0}' is already subscribed")]
    AlreadySubscribed(String),

    #[error("no subscriber '{0}'")]
    NotFound(String),

    #[error("no pending challenge for subscriber '{0}'")]
    NoPendingChallenge(String),

    #[error("challenge answer did not match")]
    ChallengeMismatch,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("storage backend error: {0}")]
    Storage(String),
}

impl From<RegistryError> for BecknError {
    fn from(err: RegistryError) -> Self {
        match err {
            // Not one of the named `codes::BUSINESS_*` constants; still
            // inside the BUSINESS-ERROR range per `BecknError::business`'s contract.
            RegistryError::AlreadySubscribed(id) => BecknError::business(40_005, format!("subscriber '{id}' already subscribed")),
            RegistryError::NotFound(id) => BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no subscriber '{id}'")),
            RegistryError::NoPendingChallenge(id) => BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no pending challenge for '{id}'")),
            RegistryError::ChallengeMismatch => BecknError::signature_invalid(),
            RegistryError::InvalidSignature => BecknError::signature_invalid(),
            RegistryError::Storage(msg) => BecknError::technical(codes::TECHNICAL_DATABASE, msg),
        }
    }
}
