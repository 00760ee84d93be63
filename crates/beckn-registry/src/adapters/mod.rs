pub mod in_memory;

#[cfg(feature = "rocksdb-store")]
pub mod rocksdb_store;

pub use in_memory::InMemorySubscriberRepository;

#[cfg(feature = "rocksdb-store")]
pub use rocksdb_store::RocksDbSubscriberRepository;
