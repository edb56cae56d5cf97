//! Mock implementations of the external services

pub mod clients;
pub mod crypto;
pub mod provision;

pub use clients::{MockClientFactory, MockClientFactoryBuilder};
pub use crypto::MockEncryptor;
pub use provision::RecordingProvisioner;
