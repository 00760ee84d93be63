pub mod outbound;

pub use outbound::{IssueRepository, RegistryLookup, SettlementRepository};
