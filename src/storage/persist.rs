//! Persistence adapter: the only writer of configuration records

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::error::StorageResult;
use super::traits::{ConfigStore, Provisioner};
use crate::record::ConfigRecord;

/// Writes records and runs provisioning around the write
///
/// Tables are ensured once per adapter, before its first write. The event
/// source is ensured after every successful write since each record may
/// watch a different bucket.
pub struct PersistenceAdapter {
    store: Arc<dyn ConfigStore>,
    provisioner: Arc<dyn Provisioner>,
    tables_ready: OnceCell<()>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn ConfigStore>, provisioner: Arc<dyn Provisioner>) -> Self {
        Self {
            store,
            provisioner,
            tables_ready: OnceCell::new(),
        }
    }

    pub async fn persist(&self, record: &ConfigRecord) -> StorageResult<()> {
        self.tables_ready
            .get_or_try_init(|| async {
                debug!("Ensuring supporting tables exist");
                self.provisioner.ensure_tables().await
            })
            .await?;

        self.store.put_config(record).await?;
        info!(
            "Stored configuration for {} (batch {})",
            record.s3_prefix, record.current_batch
        );

        let (bucket, prefix) = record.source_location();
        self.provisioner
            .ensure_event_source(bucket, prefix.as_deref())
            .await
    }
}
