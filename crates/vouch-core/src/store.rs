//! Durable record store.
//!
//! Businesses and opinions are kept as two independent JSON arrays under two
//! keys. Every save rewrites the whole collection; the last writer wins.
//! Reads fail soft: an unreadable or corrupt blob is logged and treated as
//! absent. Writes fail loud.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::VouchError;
use crate::seed::seed_businesses;
use crate::source::{ConnectionState, DataSource};
use crate::types::{Business, Opinion};

pub fn backup_key(key: &str) -> String {
    format!("{key}.bak")
}

pub struct RecordStore {
    source: DataSource,
    businesses_key: String,
    opinions_key: String,
    seed_on_first_run: bool,
}

impl RecordStore {
    pub fn new(source: DataSource, config: &StorageConfig) -> Self {
        Self {
            source,
            businesses_key: config.businesses_key.clone(),
            opinions_key: config.opinions_key.clone(),
            seed_on_first_run: config.seed_on_first_run,
        }
    }

    pub fn connection(&mut self) -> &ConnectionState {
        self.source.connect()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Deserializes the collection at `key`. `None` covers both a key that was
    /// never written and one whose contents could not be read or parsed.
    pub fn load<T: DeserializeOwned>(&mut self, key: &str) -> Option<Vec<T>> {
        let raw = match self.source.active().read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "storage read failed, treating as absent");
                return None;
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(key, count = items.len(), "loaded collection");
                Some(items)
            }
            Err(err) => {
                let err = VouchError::read(key, err);
                warn!(key, bytes = raw.len(), error = %err, "stored collection is corrupt, treating as absent");
                self.back_up(key, &raw);
                None
            }
        }
    }

    /// Copies an unreadable blob aside so the next save does not destroy it.
    fn back_up(&mut self, key: &str, raw: &str) {
        let backup_key = backup_key(key);
        match self.source.active().write(&backup_key, raw) {
            Ok(()) => info!(key, backup = %backup_key, "kept a copy of the corrupt collection"),
            Err(err) => warn!(key, error = %err, "could not back up corrupt collection"),
        }
    }

    pub fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), VouchError> {
        let contents = serde_json::to_string(items).map_err(|err| VouchError::write(key, err))?;
        self.source.active().write(key, &contents)?;
        debug!(key, count = items.len(), "saved collection");
        Ok(())
    }

    /// Returns the stored businesses, seeding the store on first run.
    pub fn load_businesses(&mut self) -> Vec<Business> {
        let key = self.businesses_key.clone();
        if let Some(businesses) = self.load(&key) {
            return businesses;
        }
        if !self.seed_on_first_run {
            return Vec::new();
        }
        let seed = seed_businesses();
        match self.save(&key, &seed) {
            Ok(()) => info!(key = %key, count = seed.len(), "seeded business collection"),
            Err(err) => warn!(key = %key, error = %err, "could not persist seed, keeping it in memory"),
        }
        seed
    }

    pub fn load_opinions(&mut self) -> Vec<Opinion> {
        let key = self.opinions_key.clone();
        self.load(&key).unwrap_or_default()
    }

    pub fn save_businesses(&mut self, businesses: &[Business]) -> Result<(), VouchError> {
        let key = self.businesses_key.clone();
        self.save(&key, businesses)
    }

    pub fn save_opinions(&mut self, opinions: &[Opinion]) -> Result<(), VouchError> {
        let key = self.opinions_key.clone();
        self.save(&key, opinions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, KeyValueBackend, MemoryBackend};
    use crate::config::Config;
    use crate::ids::{BusinessId, OpinionId, UserId};
    use crate::types::{OpinionStatus, OpinionType};
    use time::OffsetDateTime;

    fn store_over(backend: MemoryBackend) -> RecordStore {
        let config = Config::default_config();
        RecordStore::new(DataSource::local(backend), &config.storage)
    }

    fn opinion(title: &str, rating: Option<u8>) -> Opinion {
        Opinion {
            id: OpinionId::new(),
            business_id: BusinessId::from("2"),
            user_id: Some(UserId::from("user-1")),
            opinion_type: OpinionType::Praise,
            title: title.to_string(),
            content: "Lovely service".to_string(),
            rating,
            status: OpinionStatus::Pending,
            is_anonymous: false,
            is_public: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn first_run_seeds_and_persists_businesses() {
        let backend = MemoryBackend::new();
        let mut store = store_over(backend.clone());
        let businesses = store.load_businesses();
        assert_eq!(businesses.len(), 4);
        assert_eq!(businesses[1].name, "Mary's Kitchen & Catering");
        assert!(backend.read("localBusinesses").unwrap().is_some());
    }

    #[test]
    fn seeding_can_be_disabled() {
        let mut config = Config::default_config();
        config.storage.seed_on_first_run = false;
        let mut store = RecordStore::new(DataSource::local(MemoryBackend::new()), &config.storage);
        assert!(store.load_businesses().is_empty());
    }

    #[test]
    fn missing_opinions_load_empty() {
        let mut store = store_over(MemoryBackend::new());
        assert!(store.load_opinions().is_empty());
    }

    #[test]
    fn corrupt_blob_falls_back() {
        let backend = MemoryBackend::new();
        backend.write("localOpinions", "{not json").unwrap();
        backend.write("localBusinesses", "[{\"id\": 3}]").unwrap();
        let mut store = store_over(backend);
        assert!(store.load_opinions().is_empty());
        assert_eq!(store.load_businesses().len(), 4);
    }

    #[test]
    fn corrupt_blob_is_backed_up_before_overwrite() {
        let backend = MemoryBackend::new();
        backend.write("localOpinions", "[{\"rating\": 4.5}]").unwrap();
        let mut store = store_over(backend.clone());
        assert!(store.load_opinions().is_empty());
        store.save_opinions(&[opinion("fresh", Some(5))]).unwrap();
        assert_eq!(
            backend.read(&backup_key("localOpinions")).unwrap().as_deref(),
            Some("[{\"rating\": 4.5}]")
        );
    }

    struct RejectsWrites(MemoryBackend);

    impl KeyValueBackend for RejectsWrites {
        fn read(&self, key: &str) -> Result<Option<String>, VouchError> {
            self.0.read(key)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), VouchError> {
            Err(VouchError::write(key, "quota exceeded"))
        }

        fn describe(&self) -> String {
            "full store".to_string()
        }
    }

    #[test]
    fn seed_stays_in_memory_when_it_cannot_be_persisted() {
        let backend = MemoryBackend::new();
        let config = Config::default_config();
        let mut store = RecordStore::new(
            DataSource::local(RejectsWrites(backend.clone())),
            &config.storage,
        );
        let businesses = store.load_businesses();
        assert_eq!(businesses.len(), 4);
        assert_eq!(businesses[0].name, "Reflection Beauty Clinic");
        assert!(backend.is_empty());
        assert!(store.save_businesses(&businesses).is_err());
    }

    #[test]
    fn save_then_load_returns_equal_items() {
        let mut store = store_over(MemoryBackend::new());
        let items = vec![opinion("first", Some(4)), opinion("second", None)];
        store.save_opinions(&items).unwrap();
        let loaded: Vec<Opinion> = store.load("localOpinions").unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn repeated_loads_are_equal() {
        let mut store = store_over(MemoryBackend::new());
        let first = store.load_businesses();
        let second = store.load_businesses();
        assert_eq!(first, second);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default_config();
        let items = vec![opinion("kept", Some(3))];
        {
            let mut store = RecordStore::new(DataSource::local(FileBackend::new(dir.path())), &config.storage);
            store.save_opinions(&items).unwrap();
        }
        let mut reopened = RecordStore::new(DataSource::local(FileBackend::new(dir.path())), &config.storage);
        assert_eq!(reopened.load_opinions(), items);
    }
}
