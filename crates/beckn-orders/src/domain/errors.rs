use thiserror::Error;

use crate::domain::types::OrderState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("no order for transaction_id {0}")]
    NotFound(uuid::Uuid),

    #[error("invalid transition from {from:?} via action '{action}'")]
    InvalidTransition { from: OrderState, action: String },

    #[error("unknown cancellation/return reason code '{0}'")]
    UnknownReasonCode(String),

    #[error("rating {0} is outside the 1-5 range")]
    RatingOutOfRange(u8),

    #[error("storage backend error: {0}")]
    Storage(String),
}
