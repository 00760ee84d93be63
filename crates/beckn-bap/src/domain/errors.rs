use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BapError {
    #[error("{0}")]
    Beckn(#[from] BecknError),

    #[error("no transaction log entries for transaction_id {0}")]
    UnknownTransaction(uuid::Uuid),

    #[error("action '{0}' requires bpp_id and bpp_uri")]
    MissingCounterparty(String),

    #[error("transaction log error: {0}")]
    TxLog(#[from] beckn_txlog::TxLogError),
}

impl From<BapError> for BecknError {
    fn from(err: BapError) -> Self {
        match err {
            BapError::Beckn(e) => e,
            BapError::UnknownTransaction(id) => {
                BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no transaction '{id}'"))
            }
            BapError::MissingCounterparty(action) => {
                BecknError::context(codes::CONTEXT_MISSING_COUNTERPARTY, format!("'{action}' requires bpp_id and bpp_uri"))
            }
            BapError::TxLog(e) => BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()),
        }
    }
}

impl From<BapError> for beckn_http::ApiError {
    fn from(err: BapError) -> Self {
        BecknError::from(err).into()
    }
}
