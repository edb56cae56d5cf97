//! Mock client factory
//!
//! Every region shares one encryptor, store and provisioner so tests can
//! inspect the whole run in one place.

use crate::clients::{ClientFactory, RegionClients};
use crate::error::SetupError;
use crate::storage::backends::MemoryConfigStore;
use crate::storage::PersistenceAdapter;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{MockEncryptor, RecordingProvisioner};

/// Builder for creating configured mock client factories
#[derive(Default)]
pub struct MockClientFactoryBuilder {
    fail_encryption: bool,
    encryption_successes: Option<usize>,
    fail_writes: bool,
    fail_tables: bool,
}

impl MockClientFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_encryption(mut self) -> Self {
        self.fail_encryption = true;
        self
    }

    /// Let the first `successes` encrypt calls through, then fail
    pub fn fail_encryption_after(mut self, successes: usize) -> Self {
        self.encryption_successes = Some(successes);
        self
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn fail_tables(mut self) -> Self {
        self.fail_tables = true;
        self
    }

    pub fn build(self) -> MockClientFactory {
        let encryptor = match (self.fail_encryption, self.encryption_successes) {
            (true, _) => MockEncryptor::failing("AccessDeniedException"),
            (false, Some(successes)) => MockEncryptor::new().fail_after(successes),
            (false, None) => MockEncryptor::new(),
        };
        let store = if self.fail_writes {
            MemoryConfigStore::new().fail_writes()
        } else {
            MemoryConfigStore::new()
        };
        let provisioner = if self.fail_tables {
            RecordingProvisioner::new().fail_tables()
        } else {
            RecordingProvisioner::new()
        };

        let store = Arc::new(store);
        let provisioner = Arc::new(provisioner);
        let persistence = Arc::new(PersistenceAdapter::new(store.clone(), provisioner.clone()));

        MockClientFactory {
            encryptor: Arc::new(encryptor),
            store,
            provisioner,
            persistence,
            regions_requested: Mutex::new(Vec::new()),
        }
    }
}

pub struct MockClientFactory {
    encryptor: Arc<MockEncryptor>,
    store: Arc<MemoryConfigStore>,
    provisioner: Arc<RecordingProvisioner>,
    persistence: Arc<PersistenceAdapter>,
    regions_requested: Mutex<Vec<String>>,
}

impl Default for MockClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClientFactory {
    pub fn new() -> Self {
        MockClientFactoryBuilder::new().build()
    }

    pub fn builder() -> MockClientFactoryBuilder {
        MockClientFactoryBuilder::new()
    }

    pub fn encryptor(&self) -> &MockEncryptor {
        &self.encryptor
    }

    pub fn store(&self) -> &MemoryConfigStore {
        &self.store
    }

    pub fn provisioner(&self) -> &RecordingProvisioner {
        &self.provisioner
    }

    /// Regions passed to `for_region`, in call order
    pub fn regions_requested(&self) -> Vec<String> {
        self.regions_requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientFactory for MockClientFactory {
    async fn for_region(&self, region: &str) -> Result<RegionClients, SetupError> {
        self.regions_requested
            .lock()
            .unwrap()
            .push(region.to_string());

        Ok(RegionClients {
            region: region.to_string(),
            encryptor: self.encryptor.clone(),
            persistence: self.persistence.clone(),
        })
    }
}
