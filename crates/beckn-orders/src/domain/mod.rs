pub mod errors;
pub mod machine;
pub mod messages;
pub mod types;

pub use errors::OrderError;
pub use messages::{CancelPayload, ConfirmPayload, InitPayload, RatingPayload, SelectPayload, UpdatePayload};
pub use types::{is_valid_cancel_reason, is_valid_return_reason, Actor, Order, OrderState, StateTransition};
