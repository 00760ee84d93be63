pub mod outbound;

pub use outbound::TransactionLogRepository;
