//! Production subscriber store backed by RocksDB, column-family-isolated
//! per entity — the whole table set fits comfortably in a handful of
//! CFs.

use std::sync::Arc;

use beckn_types::{Subscriber, SubscriberDomain};
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};

use crate::domain::audit::AuditEntry;
use crate::domain::errors::RegistryError;
use crate::domain::types::PendingChallenge;
use crate::ports::outbound::SubscriberRepository;

const CF_SUBSCRIBERS: &str = "subscribers";
const CF_DOMAIN_EXTENSIONS: &str = "domain_extensions";
const CF_PENDING_CHALLENGES: &str = "pending_challenges";
const CF_AUDIT: &str = "audit";
const COLUMN_FAMILIES: &[&str] = &[CF_SUBSCRIBERS, CF_DOMAIN_EXTENSIONS, CF_PENDING_CHALLENGES, CF_AUDIT];

pub struct RocksDbSubscriberRepository {
    db: Arc<RwLock<DB>>,
}

impl RocksDbSubscriberRepository {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, RegistryError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> =
            COLUMN_FAMILIES.iter().map(|name| ColumnFamilyDescriptor::new(*name, Options::default())).collect();

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| RegistryError::Storage(format!("failed to open rocksdb: {e}")))?;
        Ok(Self { db: Arc::new(RwLock::new(db)) })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>, RegistryError> {
        let db = self.db.read();
        let cf = db.cf_handle(cf_name).expect("column family registered at open");
        let raw = db.get_cf(&cf, key).map_err(|e| RegistryError::Storage(e.to_string()))?;
        raw.map(|bytes| serde_json::from_slice(&bytes).map_err(|e| RegistryError::Storage(e.to_string()))).transpose()
    }

    fn put_json<T: serde::Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec(value).map_err(|e| RegistryError::Storage(e.to_string()))?;
        let db = self.db.read();
        let cf = db.cf_handle(cf_name).expect("column family registered at open");
        db.put_cf(&cf, key, bytes).map_err(|e| RegistryError::Storage(e.to_string()))
    }

    fn delete_key(&self, cf_name: &str, key: &str) -> Result<(), RegistryError> {
        let db = self.db.read();
        let cf = db.cf_handle(cf_name).expect("column family registered at open");
        db.delete_cf(&cf, key).map_err(|e| RegistryError::Storage(e.to_string()))
    }

    fn scan_cf<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>, RegistryError> {
        let db = self.db.read();
        let cf = db.cf_handle(cf_name).expect("column family registered at open");
        db.iterator_cf(&cf, rocksdb::IteratorMode::Start)
            .map(|item| {
                let (_, value) = item.map_err(|e| RegistryError::Storage(e.to_string()))?;
                serde_json::from_slice(&value).map_err(|e| RegistryError::Storage(e.to_string()))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SubscriberRepository for RocksDbSubscriberRepository {
    async fn get(&self, subscriber_id: &str) -> Result<Option<Subscriber>, RegistryError> {
        self.get_json(CF_SUBSCRIBERS, subscriber_id)
    }

    async fn upsert(&self, subscriber: Subscriber) -> Result<(), RegistryError> {
        self.put_json(CF_SUBSCRIBERS, &subscriber.subscriber_id.clone(), &subscriber)
    }

    async fn delete(&self, subscriber_id: &str) -> Result<(), RegistryError> {
        self.delete_key(CF_SUBSCRIBERS, subscriber_id)
    }

    async fn list(&self) -> Result<Vec<Subscriber>, RegistryError> {
        self.scan_cf(CF_SUBSCRIBERS)
    }

    async fn list_domain_extensions(&self) -> Result<Vec<SubscriberDomain>, RegistryError> {
        self.scan_cf(CF_DOMAIN_EXTENSIONS)
    }

    async fn put_pending_challenge(&self, challenge: PendingChallenge) -> Result<(), RegistryError> {
        let key = challenge.subscriber_id.clone();
        let wire = PendingChallengeWire::from(challenge);
        self.put_json(CF_PENDING_CHALLENGES, &key, &wire)
    }

    async fn take_pending_challenge(&self, subscriber_id: &str) -> Result<Option<PendingChallenge>, RegistryError> {
        let wire: Option<PendingChallengeWire> = self.get_json(CF_PENDING_CHALLENGES, subscriber_id)?;
        if wire.is_some() {
            self.delete_key(CF_PENDING_CHALLENGES, subscriber_id)?;
        }
        Ok(wire.map(Into::into))
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<(), RegistryError> {
        let mut entries: Vec<AuditEntry> = self.get_json(CF_AUDIT, &entry.subscriber_id)?.unwrap_or_default();
        entries.push(entry.clone());
        self.put_json(CF_AUDIT, &entry.subscriber_id, &entries)
    }

    async fn list_audit(&self, subscriber_id: &str) -> Result<Vec<AuditEntry>, RegistryError> {
        Ok(self.get_json(CF_AUDIT, subscriber_id)?.unwrap_or_default())
    }
}

/// `PendingChallenge` carries no `Serialize`/`Deserialize` itself (it's
/// never sent over the wire); this mirrors it for at-rest storage only.
#[derive(serde::Serialize, serde::Deserialize)]
struct PendingChallengeWire {
    subscriber_id: String,
    plaintext_b64: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PendingChallenge> for PendingChallengeWire {
    fn from(p: PendingChallenge) -> Self {
        Self { subscriber_id: p.subscriber_id, plaintext_b64: p.plaintext_b64, created_at: p.created_at }
    }
}

impl From<PendingChallengeWire> for PendingChallenge {
    fn from(p: PendingChallengeWire) -> Self {
        Self { subscriber_id: p.subscriber_id, plaintext_b64: p.plaintext_b64, created_at: p.created_at }
    }
}
