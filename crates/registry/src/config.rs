//! Registry configuration.
//!
//! The administrator is supplied here by whoever bootstraps the registry and
//! is stored once at construction. Example TOML:
//!
//! ```toml
//! administrator = "0x0101010101010101010101010101010101010101010101010101010101010101"
//!
//! [storage]
//! path = "/var/lib/pet-registry"
//! flush_on_write = true
//! ```

use crate::errors::{RegistryError, Result};
use pet_registry_types::Identity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Identity allowed to delete any record
    pub administrator: Identity,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sled directory; in-memory when unset
    pub path: Option<PathBuf>,
    /// Flush sled after every mutation
    pub flush_on_write: bool,
}

impl RegistryConfig {
    /// In-memory configuration with the given administrator.
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            storage: StorageConfig::default(),
        }
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.path = Some(path.into());
        self
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| RegistryError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let admin = Identity::new([1u8; 32]);
        let raw = format!("administrator = \"{admin}\"\n");
        let config = RegistryConfig::from_toml_str(&raw).unwrap();
        assert_eq!(config, RegistryConfig::new(admin));
        assert!(config.storage.path.is_none());
        assert!(!config.storage.flush_on_write);
    }

    #[test]
    fn parses_storage_section() {
        let admin = Identity::new([2u8; 32]);
        let raw = format!(
            "administrator = \"{admin}\"\n\n[storage]\npath = \"/tmp/pets\"\nflush_on_write = true\n"
        );
        let config = RegistryConfig::from_toml_str(&raw).unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/pets")));
        assert!(config.storage.flush_on_write);
    }

    #[test]
    fn rejects_malformed_administrator() {
        let err = RegistryConfig::from_toml_str("administrator = \"not-an-identity\"").unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RegistryConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RegistryError::Config(msg) if msg.contains("here.toml")));
    }
}
