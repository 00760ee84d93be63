//! Catalog entity and its TTL/incremental-update vocabulary (C9), owned
//! per-provider by the BPP that stores it (§3 Ownership).

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryCatalogRepository;
pub use domain::{build_on_search_response, CatalogError, CatalogUpdate, ItemPatch, StoredCatalog, UpdateKind, DEFAULT_TTL, MAX_PENDING_UPDATES};
pub use ports::CatalogRepository;
