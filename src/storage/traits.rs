//! Trait seams for the store and supporting infrastructure

use async_trait::async_trait;

use super::error::StorageResult;
use crate::record::ConfigRecord;

/// Durable store for configuration records
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Write one complete record, replacing any record with the same prefix
    async fn put_config(&self, record: &ConfigRecord) -> StorageResult<()>;
}

/// One-time infrastructure the loader depends on
///
/// Both operations are idempotent and safe to call on every run.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create the configuration, batch and processed-file tables if missing
    async fn ensure_tables(&self) -> StorageResult<()>;

    /// Route object-created events under `bucket`/`prefix` to the loader
    async fn ensure_event_source(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<()>;
}
