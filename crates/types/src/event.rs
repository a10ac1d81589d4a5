use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// State change published by the registry after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistryEvent {
    PetRegistered {
        owner: Identity,
        name: String,
        age: u8,
        vaccinated: bool,
    },
    VaccinationUpdated {
        owner: Identity,
        vaccinated: bool,
    },
    PetDeleted {
        owner: Identity,
    },
}

impl RegistryEvent {
    /// Identity whose record the event concerns.
    pub fn owner(&self) -> &Identity {
        match self {
            RegistryEvent::PetRegistered { owner, .. }
            | RegistryEvent::VaccinationUpdated { owner, .. }
            | RegistryEvent::PetDeleted { owner } => owner,
        }
    }
}
