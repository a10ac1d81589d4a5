//! Error types for the pet registry

use pet_registry_types::{Identity, InvalidInput};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("User already has a registered pet")]
    DuplicateRecord { owner: Identity },

    #[error("User has no registered pet")]
    NotFound { owner: Identity },

    #[error("Only owner can call this function")]
    Unauthorized { requester: Identity },

    #[error("Stored record for {owner} violates record rules: {reason}")]
    CorruptRecord { owner: Identity, reason: InvalidInput },

    #[error("Registry storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Invalid registry configuration: {0}")]
    Config(String),

    #[error("Stored administrator {stored} does not match configured administrator {configured}")]
    AdministratorMismatch {
        stored: Identity,
        configured: Identity,
    },
}

/// Payload-free discriminant of [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateRecord,
    NotFound,
    Unauthorized,
    CorruptRecord,
    Storage,
    Config,
    AdministratorMismatch,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidInput(_) => ErrorKind::InvalidInput,
            RegistryError::DuplicateRecord { .. } => ErrorKind::DuplicateRecord,
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::Unauthorized { .. } => ErrorKind::Unauthorized,
            RegistryError::CorruptRecord { .. } => ErrorKind::CorruptRecord,
            RegistryError::Storage(_) => ErrorKind::Storage,
            RegistryError::Config(_) => ErrorKind::Config,
            RegistryError::AdministratorMismatch { .. } => ErrorKind::AdministratorMismatch,
        }
    }

    /// Usage errors the caller can fix by changing the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInput
                | ErrorKind::DuplicateRecord
                | ErrorKind::NotFound
                | ErrorKind::Unauthorized
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
