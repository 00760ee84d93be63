//! Order entity, state machine (C10) and per-transaction serialization for
//! the BPP engine, which is the sole owner of order rows (§3 Ownership).

pub mod adapters;
pub mod domain;
pub mod lock;
pub mod ports;

pub use adapters::InMemoryOrderRepository;
pub use domain::machine;
pub use domain::{
    is_valid_cancel_reason, is_valid_return_reason, Actor, CancelPayload, ConfirmPayload, InitPayload, Order,
    OrderError, OrderState, RatingPayload, SelectPayload, StateTransition, UpdatePayload,
};
pub use lock::{OwnedLockGuard, TransactionLockTable};
pub use ports::OrderRepository;
