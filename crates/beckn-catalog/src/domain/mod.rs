pub mod errors;
pub mod search;
pub mod types;

pub use errors::CatalogError;
pub use search::build_on_search_response;
pub use types::{CatalogUpdate, ItemPatch, StoredCatalog, UpdateKind, DEFAULT_TTL, MAX_PENDING_UPDATES};
