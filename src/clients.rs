//! Region-scoped service clients
//!
//! The region step asks a [`ClientFactory`] for the clients of the loader's
//! region. Clients are built once per region and reused, so loaders in
//! different regions each get their own encryptor and store.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::crypto::{Encryptor, KmsEncryptor};
use crate::error::SetupError;
use crate::storage::backends::{
    AwsProvisioner, DryRunProvisioner, DryRunStore, DynamoConfigStore, ProvisionTargets,
};
use crate::storage::{ConfigStore, PersistenceAdapter, Provisioner};

pub const DEFAULT_CONFIG_TABLE: &str = "LambdaRedshiftBatchLoadConfig";
pub const DEFAULT_BATCH_TABLE: &str = "LambdaRedshiftBatches";
pub const DEFAULT_FILES_TABLE: &str = "LambdaRedshiftProcessedFiles";
pub const DEFAULT_MASTER_KEY_ALIAS: &str = "alias/LambaRedshiftLoaderKey";
pub const DEFAULT_LOADER_FUNCTION: &str = "LambdaRedshiftLoader";

/// Settings shared by every region's clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    /// Endpoint override for local emulators
    pub endpoint_url: Option<String>,
    pub config_table: String,
    pub batch_table: String,
    pub files_table: String,
    pub master_key_alias: String,
    pub loader_function: String,
    /// Print records instead of writing them; skip provisioning
    pub dry_run: bool,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            config_table: DEFAULT_CONFIG_TABLE.to_string(),
            batch_table: DEFAULT_BATCH_TABLE.to_string(),
            files_table: DEFAULT_FILES_TABLE.to_string(),
            master_key_alias: DEFAULT_MASTER_KEY_ALIAS.to_string(),
            loader_function: DEFAULT_LOADER_FUNCTION.to_string(),
            dry_run: false,
        }
    }
}

impl AwsSettings {
    fn provision_targets(&self) -> ProvisionTargets {
        ProvisionTargets {
            config_table: self.config_table.clone(),
            batch_table: self.batch_table.clone(),
            files_table: self.files_table.clone(),
            loader_function: self.loader_function.clone(),
        }
    }
}

/// Clients for one region, carried through a pipeline run
#[derive(Clone)]
pub struct RegionClients {
    pub region: String,
    pub encryptor: Arc<dyn Encryptor>,
    pub persistence: Arc<PersistenceAdapter>,
}

impl std::fmt::Debug for RegionClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionClients")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Produces the clients for a validated region
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn for_region(&self, region: &str) -> Result<RegionClients, SetupError>;
}

/// Builds AWS SDK clients from the default credential chain
pub struct AwsClientFactory {
    settings: AwsSettings,
    cache: Mutex<HashMap<String, RegionClients>>,
}

impl AwsClientFactory {
    pub fn new(settings: AwsSettings) -> Self {
        Self {
            settings,
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn build(&self, region: &str) -> Result<RegionClients, SetupError> {
        info!("Initializing AWS clients for {}", region);

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(endpoint) = &self.settings.endpoint_url {
            debug!("Using endpoint override {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let kms = aws_sdk_kms::Client::new(&sdk_config);
        let encryptor = KmsEncryptor::new(kms, &self.settings.master_key_alias);
        if !self.settings.dry_run {
            encryptor.ensure_master_key().await?;
        }

        let (store, provisioner): (Arc<dyn ConfigStore>, Arc<dyn Provisioner>) =
            if self.settings.dry_run {
                (Arc::new(DryRunStore), Arc::new(DryRunProvisioner))
            } else {
                let dynamodb = aws_sdk_dynamodb::Client::new(&sdk_config);
                let lambda = aws_sdk_lambda::Client::new(&sdk_config);
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .force_path_style(self.settings.endpoint_url.is_some())
                    .build();
                let s3 = aws_sdk_s3::Client::from_conf(s3_config);

                (
                    Arc::new(DynamoConfigStore::new(
                        dynamodb.clone(),
                        &self.settings.config_table,
                    )),
                    Arc::new(AwsProvisioner::new(
                        dynamodb,
                        lambda,
                        s3,
                        self.settings.provision_targets(),
                    )),
                )
            };

        Ok(RegionClients {
            region: region.to_string(),
            encryptor: Arc::new(encryptor),
            persistence: Arc::new(PersistenceAdapter::new(store, provisioner)),
        })
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn for_region(&self, region: &str) -> Result<RegionClients, SetupError> {
        let mut cache = self.cache.lock().await;
        if let Some(clients) = cache.get(region) {
            return Ok(clients.clone());
        }

        let clients = self.build(region).await?;
        cache.insert(region.to_string(), clients.clone());
        Ok(clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_loader_deployment() {
        let settings = AwsSettings::default();
        assert_eq!(settings.config_table, "LambdaRedshiftBatchLoadConfig");
        assert_eq!(settings.master_key_alias, "alias/LambaRedshiftLoaderKey");
        assert!(!settings.dry_run);

        let targets = settings.provision_targets();
        assert_eq!(targets.batch_table, "LambdaRedshiftBatches");
        assert_eq!(targets.files_table, "LambdaRedshiftProcessedFiles");
        assert_eq!(targets.loader_function, "LambdaRedshiftLoader");
    }
}
