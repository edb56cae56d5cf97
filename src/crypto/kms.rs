//! AWS KMS encryptor

use super::{CryptoError, CryptoResult, Encryptor, Envelope};
use async_trait::async_trait;
use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use tracing::{debug, info};

/// Encrypts secrets with the master key behind `key_alias`
pub struct KmsEncryptor {
    client: Client,
    key_alias: String,
}

impl KmsEncryptor {
    pub fn new(client: Client, key_alias: impl Into<String>) -> Self {
        Self {
            client,
            key_alias: key_alias.into(),
        }
    }

    async fn create_master_key(&self) -> CryptoResult<()> {
        info!("Creating master key {}", self.key_alias);

        let created = self
            .client
            .create_key()
            .description("Lambda Redshift Loader Master Encryption Key")
            .send()
            .await
            .map_err(|e| {
                CryptoError::KeySetup(format!(
                    "CreateKey failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let key_ref = created
            .key_metadata()
            .and_then(|m| m.arn().map(str::to_string))
            .ok_or_else(|| CryptoError::KeySetup("CreateKey returned no key ARN".to_string()))?;

        self.client
            .create_alias()
            .alias_name(&self.key_alias)
            .target_key_id(&key_ref)
            .send()
            .await
            .map_err(|e| {
                CryptoError::KeySetup(format!(
                    "CreateAlias {} failed: {}",
                    self.key_alias,
                    DisplayErrorContext(&e)
                ))
            })?;

        info!("Created master key {} as {}", key_ref, self.key_alias);
        Ok(())
    }
}

#[async_trait]
impl Encryptor for KmsEncryptor {
    async fn ensure_master_key(&self) -> CryptoResult<()> {
        match self
            .client
            .describe_key()
            .key_id(&self.key_alias)
            .send()
            .await
        {
            Ok(_) => {
                debug!("Master key {} exists", self.key_alias);
                Ok(())
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found_exception() {
                    self.create_master_key().await
                } else {
                    Err(CryptoError::KeySetup(format!(
                        "DescribeKey {} failed: {}",
                        self.key_alias,
                        DisplayErrorContext(&service_err)
                    )))
                }
            }
        }
    }

    async fn encrypt(&self, plaintext: &str) -> CryptoResult<Envelope> {
        let output = self
            .client
            .encrypt()
            .key_id(&self.key_alias)
            .plaintext(Blob::new(plaintext.as_bytes()))
            .send()
            .await
            .map_err(|e| CryptoError::Service(format!("{}", DisplayErrorContext(&e))))?;

        let ciphertext = output
            .ciphertext_blob()
            .map(|blob| blob.as_ref().to_vec())
            .filter(|bytes| !bytes.is_empty())
            .ok_or(CryptoError::EmptyCiphertext)?;

        Ok(Envelope { ciphertext })
    }
}
