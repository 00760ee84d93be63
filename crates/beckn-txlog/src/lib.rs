//! Append-only transaction log (C4): every inbound/outbound message with
//! its status, correlated by `transaction_id`/`message_id`.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryTransactionLog;
pub use domain::TxLogError;
pub use ports::TransactionLogRepository;
