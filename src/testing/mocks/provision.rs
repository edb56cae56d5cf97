//! Mock provisioner that records what it was asked to do

use crate::storage::{Provisioner, StorageError, StorageResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingProvisioner {
    table_calls: Arc<Mutex<usize>>,
    event_sources: Arc<Mutex<Vec<(String, Option<String>)>>>,
    fail_tables: bool,
}

impl RecordingProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_tables(mut self) -> Self {
        self.fail_tables = true;
        self
    }

    pub fn table_calls(&self) -> usize {
        *self.table_calls.lock().unwrap()
    }

    /// `(bucket, prefix)` pairs in call order
    pub fn event_sources(&self) -> Vec<(String, Option<String>)> {
        self.event_sources.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provisioner for RecordingProvisioner {
    async fn ensure_tables(&self) -> StorageResult<()> {
        *self.table_calls.lock().unwrap() += 1;
        if self.fail_tables {
            return Err(StorageError::table("mock", "create denied"));
        }
        Ok(())
    }

    async fn ensure_event_source(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<()> {
        self.event_sources
            .lock()
            .unwrap()
            .push((bucket.to_string(), prefix.map(str::to_string)));
        Ok(())
    }
}
