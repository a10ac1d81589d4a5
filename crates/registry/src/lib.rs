//! Per-owner pet registry.
//!
//! Each caller identity may hold exactly one pet record. Owners register and
//! read their own record and may flip its vaccination flag; the administrator
//! fixed at construction is the only identity allowed to delete records.
//! Caller identities are passed explicitly on every call and trusted as given.

pub mod config;
pub mod errors;
pub mod registry;

pub use config::{RegistryConfig, StorageConfig};
pub use errors::*;
pub use pet_registry_storage::{MemoryStorage, NullStorage, RecordStore, SledStorage};
pub use pet_registry_types::*;
pub use registry::{PetRegistry, EVENT_CHANNEL_CAPACITY};
