pub mod in_memory;
pub mod registry_http;

pub use in_memory::StaticRegistryLookup;
pub use registry_http::HttpRegistryLookup;
