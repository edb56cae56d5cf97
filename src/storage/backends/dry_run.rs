//! Dry-run backends: print what would be written, touch nothing

use async_trait::async_trait;
use tracing::info;

use crate::record::ConfigRecord;
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::{ConfigStore, Provisioner},
};

/// Prints each record as pretty JSON on stdout
#[derive(Debug, Default)]
pub struct DryRunStore;

#[async_trait]
impl ConfigStore for DryRunStore {
    async fn put_config(&self, record: &ConfigRecord) -> StorageResult<()> {
        let rendered = serde_json::to_string_pretty(record).map_err(StorageError::serialization)?;
        println!("{}", rendered);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DryRunProvisioner;

#[async_trait]
impl Provisioner for DryRunProvisioner {
    async fn ensure_tables(&self) -> StorageResult<()> {
        info!("Dry run: not checking supporting tables");
        Ok(())
    }

    async fn ensure_event_source(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<()> {
        info!(
            "Dry run: not configuring notifications for {}/{}",
            bucket,
            prefix.unwrap_or_default()
        );
        Ok(())
    }
}
