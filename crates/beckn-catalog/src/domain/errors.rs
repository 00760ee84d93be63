use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog stored for subscriber {0}")]
    NotFound(String),

    #[error("no item '{item_id}' in subscriber {subscriber_id}'s catalog")]
    ItemNotFound { subscriber_id: String, item_id: String },

    #[error("storage backend error: {0}")]
    Storage(String),
}

impl From<CatalogError> for BecknError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no catalog for '{id}'")),
            CatalogError::ItemNotFound { subscriber_id, item_id } => {
                BecknError::domain(codes::DOMAIN_UNKNOWN_ITEM, format!("no item '{item_id}' for subscriber '{subscriber_id}'"))
            }
            CatalogError::Storage(msg) => BecknError::technical(codes::TECHNICAL_DATABASE, msg),
        }
    }
}
