//! In-memory config store for testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::record::ConfigRecord;
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::ConfigStore,
};

const MEMORY_TABLE: &str = "memory";

/// Keeps every written record in insertion order
#[derive(Default)]
pub struct MemoryConfigStore {
    records: Arc<RwLock<Vec<ConfigRecord>>>,
    fail_writes: bool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub async fn records(&self) -> Vec<ConfigRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn put_config(&self, record: &ConfigRecord) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::write(MEMORY_TABLE, "write rejected"));
        }

        let mut records = self.records.write().await;
        records.retain(|existing| existing.s3_prefix != record.s3_prefix);
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_record;

    #[tokio::test]
    async fn test_put_replaces_same_prefix() {
        let store = MemoryConfigStore::new();
        let first = sample_record("bucket/in");
        let second = sample_record("bucket/in");

        store.put_config(&first).await.unwrap();
        store.put_config(&second).await.unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].current_batch, second.current_batch);
    }
}
