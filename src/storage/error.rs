//! Error types for the storage and provisioning layer

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record could not be rendered into the store's item format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The put of a configuration record failed
    #[error("Write to {table} failed: {message}")]
    Write { table: String, message: String },

    /// A supporting table could not be described or created
    #[error("Table {table}: {message}")]
    Table { table: String, message: String },

    /// A supporting table never reached the ACTIVE state
    #[error("Timeout: {table} not active after {waited:?}")]
    Timeout { table: String, waited: Duration },

    /// Object storage notification or function permission setup failed
    #[error("Event source error: {0}")]
    EventSource(String),
}

impl StorageError {
    /// Create a serialization error
    pub fn serialization<E: fmt::Display>(err: E) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Create a write error for a table
    pub fn write<E: fmt::Display>(table: impl Into<String>, err: E) -> Self {
        Self::Write {
            table: table.into(),
            message: err.to_string(),
        }
    }

    /// Create a table provisioning error
    pub fn table<E: fmt::Display>(table: impl Into<String>, err: E) -> Self {
        Self::Table {
            table: table.into(),
            message: err.to_string(),
        }
    }

    /// Create an event source error
    pub fn event_source<E: fmt::Display>(msg: E) -> Self {
        Self::EventSource(msg.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}
