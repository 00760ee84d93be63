use beckn_types::{codes, BecknError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no subscriber '{0}'")]
    UnknownSubscriber(String),

    #[error("sender is not a subscribed participant")]
    SenderNotSubscribed,

    #[error("storage backend error: {0}")]
    Storage(String),
}

impl From<GatewayError> for BecknError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UnknownSubscriber(id) => {
                BecknError::domain(codes::DOMAIN_UNKNOWN_PROVIDER, format!("no subscriber '{id}'"))
            }
            GatewayError::SenderNotSubscribed => BecknError::policy(codes::POLICY_UNAUTHORIZED, err.to_string()),
            GatewayError::Storage(msg) => BecknError::technical(codes::TECHNICAL_DATABASE, msg),
        }
    }
}
