pub mod outbound;

pub use outbound::SubscriberRepository;
