use beckn_catalog::CatalogError;
use beckn_orders::OrderError;
use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BppError {
    #[error("{0}")]
    Beckn(#[from] BecknError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("transaction log error: {0}")]
    TxLog(#[from] beckn_txlog::TxLogError),

    #[error("action '{0}' requires bpp_id and bpp_uri")]
    MissingCounterparty(String),

    #[error("no grievance issue '{0}'")]
    UnknownIssue(String),

    #[error("no settlement recorded for order '{0}'")]
    UnknownSettlement(String),
}

impl From<BppError> for BecknError {
    fn from(err: BppError) -> Self {
        match err {
            BppError::Beckn(e) => e,
            BppError::Order(e) => e.into(),
            BppError::Catalog(e) => e.into(),
            BppError::TxLog(e) => BecknError::technical(codes::TECHNICAL_DATABASE, e.to_string()),
            BppError::MissingCounterparty(action) => {
                BecknError::context(codes::CONTEXT_MISSING_COUNTERPARTY, format!("'{action}' requires bpp_id and bpp_uri"))
            }
            BppError::UnknownIssue(id) => BecknError::domain(codes::DOMAIN_UNKNOWN_ISSUE, format!("no issue '{id}'")),
            BppError::UnknownSettlement(order_id) => {
                BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no settlement for order '{order_id}'"))
            }
        }
    }
}

impl From<BppError> for beckn_http::ApiError {
    fn from(err: BppError) -> Self {
        BecknError::from(err).into()
    }
}
