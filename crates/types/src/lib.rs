//! Shared data types for the pet registry.
//!
//! Identities are opaque 32-byte principals handed in by the host environment;
//! records and events are the values the registry stores and publishes.

pub mod event;
pub mod identity;
pub mod record;

pub use event::*;
pub use identity::*;
pub use record::*;
