use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxLogError {
    #[error("no transaction log entry for message_id {0}")]
    NotFound(uuid::Uuid),

    #[error("storage backend error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<TxLogError> for BecknError {
    fn from(err: TxLogError) -> Self {
        match err {
            TxLogError::NotFound(id) => BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no transaction log entry for message_id {id}")),
            TxLogError::Storage(msg) => BecknError::technical(codes::TECHNICAL_DATABASE, msg),
            TxLogError::Serialization(msg) => BecknError::technical(codes::TECHNICAL_SERIALIZATION, msg),
        }
    }
}
