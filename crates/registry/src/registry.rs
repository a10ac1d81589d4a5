//! Pet registry implementation
//!
//! One record per owner identity. Owners register and update their own
//! record; only the administrator fixed at construction may delete one.

use crate::config::RegistryConfig;
use crate::errors::*;
use parking_lot::RwLock;
use pet_registry_storage::{NullStorage, RecordStore, SledStorage};
use pet_registry_types::{Identity, PetRecord, RegistryEvent};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Buffered events per subscriber before the oldest are dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Pet Registry
///
/// Every mutation runs under the write lock from the existence check through
/// the store write to the map update, so concurrent callers observe a single
/// total order of operations.
pub struct PetRegistry {
    administrator: Identity,
    /// Owner → record mapping
    records: RwLock<HashMap<Identity, PetRecord>>,
    store: Arc<dyn RecordStore>,
    flush_on_write: bool,
    events: broadcast::Sender<RegistryEvent>,
}

impl PetRegistry {
    /// Create an in-memory registry administered by `administrator`.
    pub fn new(administrator: Identity) -> Self {
        Self::from_parts(
            administrator,
            Arc::new(NullStorage),
            HashMap::new(),
            false,
        )
    }

    /// Build a registry from configuration, opening sled when a path is set.
    pub fn open(config: RegistryConfig) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.storage.path {
            Some(path) => Arc::new(SledStorage::new(path)?),
            None => Arc::new(NullStorage),
        };
        Self::with_store(config.administrator, store, config.storage.flush_on_write)
    }

    /// Attach to an existing store, loading any records it already holds.
    ///
    /// The first open pins the administrator in the store; later opens must
    /// present the same identity.
    pub fn with_store(
        administrator: Identity,
        store: Arc<dyn RecordStore>,
        flush_on_write: bool,
    ) -> Result<Self> {
        match store.load_administrator()? {
            Some(stored) if stored != administrator => {
                return Err(RegistryError::AdministratorMismatch {
                    stored,
                    configured: administrator,
                });
            }
            Some(_) => {}
            None => {
                store.store_administrator(&administrator)?;
                store.flush()?;
            }
        }

        let records = store.load_records()?;
        for (owner, record) in &records {
            record
                .validate()
                .map_err(|reason| RegistryError::CorruptRecord {
                    owner: *owner,
                    reason,
                })?;
        }
        info!(
            administrator = %administrator,
            records = records.len(),
            "Pet registry opened"
        );

        Ok(Self::from_parts(administrator, store, records, flush_on_write))
    }

    fn from_parts(
        administrator: Identity,
        store: Arc<dyn RecordStore>,
        records: HashMap<Identity, PetRecord>,
        flush_on_write: bool,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            administrator,
            records: RwLock::new(records),
            store,
            flush_on_write,
            events,
        }
    }

    /// Register a pet for `caller`.
    pub fn register_pet(
        &self,
        caller: &Identity,
        name: impl Into<String>,
        age: u8,
        vaccinated: bool,
    ) -> Result<()> {
        let mut records = self.records.write();

        if records.contains_key(caller) {
            warn!(owner = %caller, "Rejected duplicate pet registration");
            return Err(RegistryError::DuplicateRecord { owner: *caller });
        }

        let record = PetRecord::new(name, age, vaccinated).inspect_err(|e| {
            warn!(owner = %caller, error = %e, "Rejected invalid pet registration");
        })?;

        self.persist(|store| store.put_record(caller, &record))?;

        info!(owner = %caller, name = %record.name, age, vaccinated, "Pet registered");
        self.publish(RegistryEvent::PetRegistered {
            owner: *caller,
            name: record.name.clone(),
            age,
            vaccinated,
        });
        records.insert(*caller, record);

        Ok(())
    }

    /// Fetch the record registered by `caller`.
    pub fn get_pet(&self, caller: &Identity) -> Result<PetRecord> {
        let records = self.records.read();
        let record = records
            .get(caller)
            .cloned()
            .ok_or(RegistryError::NotFound { owner: *caller })?;
        debug!(owner = %caller, "Pet record read");
        Ok(record)
    }

    /// Overwrite the vaccination flag of `caller`'s record.
    pub fn update_vaccination(&self, caller: &Identity, vaccinated: bool) -> Result<()> {
        let mut records = self.records.write();

        let Some(current) = records.get(caller) else {
            warn!(owner = %caller, "Vaccination update for unregistered owner");
            return Err(RegistryError::NotFound { owner: *caller });
        };

        let updated = PetRecord {
            vaccinated,
            ..current.clone()
        };
        self.persist(|store| store.put_record(caller, &updated))?;

        info!(owner = %caller, vaccinated, "Vaccination status updated");
        self.publish(RegistryEvent::VaccinationUpdated {
            owner: *caller,
            vaccinated,
        });
        records.insert(*caller, updated);

        Ok(())
    }

    /// Remove `target`'s record. Administrator only.
    pub fn delete_pet(&self, requester: &Identity, target: &Identity) -> Result<()> {
        // Checked before the lookup so a rejected requester learns nothing
        // about `target`.
        if *requester != self.administrator {
            warn!(requester = %requester, "Unauthorized pet deletion attempt");
            return Err(RegistryError::Unauthorized {
                requester: *requester,
            });
        }

        let mut records = self.records.write();

        if !records.contains_key(target) {
            return Err(RegistryError::NotFound { owner: *target });
        }

        self.persist(|store| store.remove_record(target))?;

        info!(owner = %target, "Pet deleted by administrator");
        self.publish(RegistryEvent::PetDeleted { owner: *target });
        records.remove(target);

        Ok(())
    }

    pub fn is_registered(&self, identity: &Identity) -> bool {
        self.records.read().contains_key(identity)
    }

    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Receive an event for every successful mutation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    fn persist(&self, op: impl FnOnce(&dyn RecordStore) -> anyhow::Result<()>) -> Result<()> {
        op(self.store.as_ref())?;
        if self.flush_on_write {
            self.store.flush()?;
        }
        Ok(())
    }

    fn publish(&self, event: RegistryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for PetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PetRegistry")
            .field("administrator", &self.administrator)
            .field("records", &self.len())
            .field("flush_on_write", &self.flush_on_write)
            .finish()
    }
}
