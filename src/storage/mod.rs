//! Storage and provisioning layer
//!
//! Records reach the store only through [`PersistenceAdapter`], which also
//! makes sure the tables and event wiring the loader function relies on are
//! in place.

pub mod backends;
pub mod error;
pub mod persist;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use persist::PersistenceAdapter;
pub use traits::{ConfigStore, Provisioner};
