pub mod in_memory;
pub mod registry_http;

pub use in_memory::{InMemoryIssueRepository, InMemorySettlementRepository, StaticRegistryLookup};
pub use registry_http::HttpRegistryLookup;
