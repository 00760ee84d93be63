pub mod dispatch;
pub mod errors;
pub mod projection;
pub mod requests;

pub use dispatch::{dispatch_search, dispatch_to_bpp};
pub use errors::BapError;
pub use projection::{CallbackProjection, ProjectionStore};
pub use requests::{
    ApiAckResponse, OrderStatusResponse, OutboundAction, OutboundApiRequest, SearchApiRequest, WebhookRegistrationRequest,
};
