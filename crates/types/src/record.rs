//! Pet record stored per owner identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Oldest age a pet may be registered with.
pub const MAX_PET_AGE: u8 = 30;

/// Reasons a pet record is rejected before it reaches the registry state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Pet name cannot be empty")]
    EmptyName,

    #[error("Pet age cannot exceed 30 years")]
    AgeOutOfRange { age: u8 },
}

/// The data registered for a single owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub name: String,
    pub age: u8,
    pub vaccinated: bool,
}

impl PetRecord {
    /// Build a record, rejecting an empty name or an age above [`MAX_PET_AGE`].
    pub fn new(name: impl Into<String>, age: u8, vaccinated: bool) -> Result<Self, InvalidInput> {
        let record = Self {
            name: name.into(),
            age,
            vaccinated,
        };
        record.validate()?;
        Ok(record)
    }

    /// Name is checked before age.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.name.is_empty() {
            return Err(InvalidInput::EmptyName);
        }
        if self.age > MAX_PET_AGE {
            return Err(InvalidInput::AgeOutOfRange { age: self.age });
        }
        Ok(())
    }

    /// `(name, age, vaccinated)` as returned to callers.
    pub fn as_tuple(&self) -> (&str, u8, bool) {
        (&self.name, self.age, self.vaccinated)
    }
}
