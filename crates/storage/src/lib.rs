use anyhow::Result;
use parking_lot::RwLock;
use pet_registry_types::{Identity, PetRecord};
use sled::{Db, Tree};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const ADMINISTRATOR_KEY: &[u8] = b"administrator";

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Corrupt identity key: {0}")]
    CorruptKey(#[from] pet_registry_types::IdentityError),
}

/// Persistence seam for registry state.
///
/// Implementations are plain key-value writers; all invariant checks happen
/// in the registry before a call reaches the store.
pub trait RecordStore: Send + Sync {
    fn load_administrator(&self) -> Result<Option<Identity>>;
    fn store_administrator(&self, administrator: &Identity) -> Result<()>;
    fn put_record(&self, owner: &Identity, record: &PetRecord) -> Result<()>;
    fn remove_record(&self, owner: &Identity) -> Result<()>;
    fn load_records(&self) -> Result<HashMap<Identity, PetRecord>>;
    fn flush(&self) -> Result<()>;
}

/// Sled-backed implementation
pub struct SledStorage {
    db: Db,
    records: Tree,
    metadata: Tree,
}

impl SledStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree("records")?;
        let metadata = db.open_tree("metadata")?;

        tracing::debug!(records = records.len(), "Opened sled record store");

        Ok(Self {
            db,
            records,
            metadata,
        })
    }
}

impl RecordStore for SledStorage {
    fn load_administrator(&self) -> Result<Option<Identity>> {
        let Some(raw) = self.metadata.get(ADMINISTRATOR_KEY)? else {
            return Ok(None);
        };
        let administrator = Identity::from_slice(&raw).map_err(StorageError::from)?;
        Ok(Some(administrator))
    }

    fn store_administrator(&self, administrator: &Identity) -> Result<()> {
        self.metadata
            .insert(ADMINISTRATOR_KEY, &administrator.as_bytes()[..])?;
        Ok(())
    }

    fn put_record(&self, owner: &Identity, record: &PetRecord) -> Result<()> {
        let data = serde_json::to_vec(record)?;
        self.records.insert(&owner.as_bytes()[..], data)?;
        Ok(())
    }

    fn remove_record(&self, owner: &Identity) -> Result<()> {
        self.records.remove(&owner.as_bytes()[..])?;
        Ok(())
    }

    fn load_records(&self) -> Result<HashMap<Identity, PetRecord>> {
        let mut out = HashMap::new();
        for item in self.records.iter() {
            let (key, val) = item?;
            let owner = Identity::from_slice(&key).map_err(StorageError::from)?;
            let record: PetRecord = serde_json::from_slice(&val)?;
            out.insert(owner, record);
        }
        Ok(out)
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Backend for registries that live only in process memory.
///
/// Writes are discarded and loads come back empty; the registry's own map is
/// the only copy of the records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStorage;

impl RecordStore for NullStorage {
    fn load_administrator(&self) -> Result<Option<Identity>> {
        Ok(None)
    }

    fn store_administrator(&self, _administrator: &Identity) -> Result<()> {
        Ok(())
    }

    fn put_record(&self, _owner: &Identity, _record: &PetRecord) -> Result<()> {
        Ok(())
    }

    fn remove_record(&self, _owner: &Identity) -> Result<()> {
        Ok(())
    }

    fn load_records(&self) -> Result<HashMap<Identity, PetRecord>> {
        Ok(HashMap::new())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory backend shared between registry instances in one process
#[derive(Default)]
pub struct MemoryStorage {
    administrator: Arc<RwLock<Option<Identity>>>,
    records: Arc<RwLock<HashMap<Identity, PetRecord>>>,
}

impl RecordStore for MemoryStorage {
    fn load_administrator(&self) -> Result<Option<Identity>> {
        Ok(*self.administrator.read())
    }

    fn store_administrator(&self, administrator: &Identity) -> Result<()> {
        *self.administrator.write() = Some(*administrator);
        Ok(())
    }

    fn put_record(&self, owner: &Identity, record: &PetRecord) -> Result<()> {
        self.records.write().insert(*owner, record.clone());
        Ok(())
    }

    fn remove_record(&self, owner: &Identity) -> Result<()> {
        self.records.write().remove(owner);
        Ok(())
    }

    fn load_records(&self) -> Result<HashMap<Identity, PetRecord>> {
        Ok(self.records.read().clone())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(store: &dyn RecordStore) {
        let alice = Identity::derive("alice");
        let admin = Identity::derive("admin");

        assert!(store.load_administrator().unwrap().is_none());
        store.store_administrator(&admin).unwrap();
        assert_eq!(store.load_administrator().unwrap(), Some(admin));

        let record = PetRecord::new("Buddy", 3, true).unwrap();
        store.put_record(&alice, &record).unwrap();
        assert_eq!(store.load_records().unwrap().get(&alice), Some(&record));

        store.remove_record(&alice).unwrap();
        assert!(store.load_records().unwrap().is_empty());
        store.flush().unwrap();
    }

    #[test]
    fn memory_storage_roundtrip() {
        exercise(&MemoryStorage::default());
    }

    #[test]
    fn null_storage_keeps_nothing() {
        let store = NullStorage;
        let owner = Identity::derive("alice");
        store.store_administrator(&owner).unwrap();
        store
            .put_record(&owner, &PetRecord::new("Buddy", 3, true).unwrap())
            .unwrap();
        assert!(store.load_administrator().unwrap().is_none());
        assert!(store.load_records().unwrap().is_empty());
    }

    #[test]
    fn sled_storage_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SledStorage::new(dir.path()).unwrap();
        exercise(&store);
    }

    #[test]
    fn sled_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let owner = Identity::derive("bob");
        let admin = Identity::derive("admin");
        {
            let store = SledStorage::new(dir.path()).unwrap();
            store.store_administrator(&admin).unwrap();
            store
                .put_record(&owner, &PetRecord::new("Max", 5, false).unwrap())
                .unwrap();
            store.flush().unwrap();
        }

        let store = SledStorage::new(dir.path()).unwrap();
        assert_eq!(store.load_administrator().unwrap(), Some(admin));
        let records = store.load_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[&owner].name, "Max");
    }
}
