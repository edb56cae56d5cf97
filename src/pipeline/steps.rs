//! The ordered field steps
//!
//! Each step reads one field from the bundle, validates it, and returns the
//! draft with that field set. Later steps may depend on what earlier steps
//! decided (region clients, data format), which is why [`ORDER`] is fixed.

use tracing::debug;

use super::prefix::normalize_s3_prefix;
use super::PipelineContext;
use crate::crypto;
use crate::error::SetupError;
use crate::input::{keys, RawBundle, ScalarValue};
use crate::record::{ConfigDraft, DataFormat, SUPPORTED_REGIONS};
use crate::validation::{
    coerce_bool, coerce_int, is_blank, optional_text, require_in_set, require_not_blank,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Region,
    S3Prefix,
    FilenameFilter,
    ClusterEndpoint,
    ClusterPort,
    ClusterUseSsl,
    ClusterDb,
    TargetTable,
    ColumnList,
    TruncateTable,
    UserName,
    UserPassword,
    DataFormat,
    CsvDelimiter,
    JsonPaths,
    ManifestBucket,
    ManifestPrefix,
    FailedManifestPrefix,
    AccessKey,
    SecretKey,
    SuccessTopic,
    FailureTopic,
    BatchSize,
    BatchSizeBytes,
    BatchTimeoutSecs,
    CopyOptions,
    SymmetricKey,
}

/// Steps in the order they run
pub const ORDER: [Step; 27] = [
    Step::Region,
    Step::S3Prefix,
    Step::FilenameFilter,
    Step::ClusterEndpoint,
    Step::ClusterPort,
    Step::ClusterUseSsl,
    Step::ClusterDb,
    Step::TargetTable,
    Step::ColumnList,
    Step::TruncateTable,
    Step::UserName,
    Step::UserPassword,
    Step::DataFormat,
    Step::CsvDelimiter,
    Step::JsonPaths,
    Step::ManifestBucket,
    Step::ManifestPrefix,
    Step::FailedManifestPrefix,
    Step::AccessKey,
    Step::SecretKey,
    Step::SuccessTopic,
    Step::FailureTopic,
    Step::BatchSize,
    Step::BatchSizeBytes,
    Step::BatchTimeoutSecs,
    Step::CopyOptions,
    Step::SymmetricKey,
];

impl Step {
    /// Input field this step reads
    pub fn field(&self) -> &'static str {
        match self {
            Step::Region => keys::REGION,
            Step::S3Prefix => keys::S3_PREFIX,
            Step::FilenameFilter => keys::FILENAME_FILTER,
            Step::ClusterEndpoint => keys::CLUSTER_ENDPOINT,
            Step::ClusterPort => keys::CLUSTER_PORT,
            Step::ClusterUseSsl => keys::CLUSTER_USE_SSL,
            Step::ClusterDb => keys::CLUSTER_DB,
            Step::TargetTable => keys::TABLE,
            Step::ColumnList => keys::COLUMN_LIST,
            Step::TruncateTable => keys::TRUNCATE_TABLE,
            Step::UserName => keys::USER_NAME,
            Step::UserPassword => keys::USER_PWD,
            Step::DataFormat => keys::DATA_FORMAT,
            Step::CsvDelimiter => keys::CSV_DELIMITER,
            Step::JsonPaths => keys::JSON_PATHS,
            Step::ManifestBucket => keys::MANIFEST_BUCKET,
            Step::ManifestPrefix => keys::MANIFEST_PREFIX,
            Step::FailedManifestPrefix => keys::FAILED_MANIFEST_PREFIX,
            Step::AccessKey => keys::ACCESS_KEY,
            Step::SecretKey => keys::SECRET_KEY,
            Step::SuccessTopic => keys::SUCCESS_TOPIC,
            Step::FailureTopic => keys::FAILURE_TOPIC,
            Step::BatchSize => keys::BATCH_SIZE,
            Step::BatchSizeBytes => keys::BATCH_SIZE_BYTES,
            Step::BatchTimeoutSecs => keys::BATCH_TIMEOUT_SECS,
            Step::CopyOptions => keys::COPY_OPTIONS,
            Step::SymmetricKey => keys::SYMMETRIC_KEY,
        }
    }

    /// Run this step, returning the updated draft
    ///
    /// Validation failures are tagged with the step's input field.
    pub async fn apply(
        self,
        bundle: &RawBundle,
        draft: ConfigDraft,
        ctx: &mut PipelineContext<'_>,
    ) -> Result<ConfigDraft, SetupError> {
        debug!("Step {:?}", self);
        self.apply_inner(bundle, draft, ctx)
            .await
            .map_err(|e| e.with_field(self.field()))
    }

    async fn apply_inner(
        self,
        bundle: &RawBundle,
        mut draft: ConfigDraft,
        ctx: &mut PipelineContext<'_>,
    ) -> Result<ConfigDraft, SetupError> {
        let value = bundle.get(self.field());

        match self {
            Step::Region => {
                let region_message =
                    format!("You must provide a region from {}", SUPPORTED_REGIONS.join(","));
                let region = require_not_blank(value, &region_message)?.to_lowercase();
                if !SUPPORTED_REGIONS.contains(&region.as_str()) {
                    return Err(SetupError::unsupported_region(region, region_message));
                }

                ctx.clients = Some(ctx.factory.for_region(&region).await?);
                draft.region = Some(region);
            }
            Step::S3Prefix => {
                let raw = require_not_blank(
                    value,
                    "You Must Provide an S3 Bucket Name, and optionally a Prefix",
                )?;
                draft.s3_prefix = Some(normalize_s3_prefix(&raw));
            }
            Step::FilenameFilter => draft.filename_filter = optional_text(value),
            Step::ClusterEndpoint => {
                draft.cluster.endpoint =
                    Some(require_not_blank(value, "You Must Provide a Cluster Endpoint")?);
            }
            Step::ClusterPort => draft.cluster.port = Some(coerce_int(value)?),
            Step::ClusterUseSsl => draft.cluster.use_ssl = coerce_bool(value),
            Step::ClusterDb => draft.cluster.database = optional_text(value),
            Step::TargetTable => {
                draft.cluster.target_table =
                    Some(require_not_blank(value, "You Must Provide a Table Name")?);
            }
            Step::ColumnList => draft.cluster.column_list = optional_text(value),
            Step::TruncateTable => draft.cluster.truncate_target = coerce_bool(value),
            Step::UserName => {
                draft.cluster.user = Some(require_not_blank(value, "You Must Provide a Username")?);
            }
            Step::UserPassword => {
                let password = require_not_blank(value, "You Must Provide a Password")?;
                draft.cluster.encrypted_password = Some(encrypt_field(ctx, &password).await?);
            }
            Step::DataFormat => {
                let raw =
                    require_not_blank(value, "You Must Provide a Data Format (CSV, JSON or AVRO)")?
                        .to_uppercase();
                require_in_set(
                    &DataFormat::ALLOWED,
                    &raw,
                    "Data Format must be one of CSV, JSON or AVRO",
                )?;
                draft.data_format = DataFormat::from_normalized(&raw);
            }
            Step::CsvDelimiter => {
                if draft.data_format.is_some_and(|f| f.uses_delimiter()) {
                    draft.csv_delimiter = Some(require_not_blank(
                        value,
                        "You Must the Delimiter for CSV Input",
                    )?);
                }
            }
            Step::JsonPaths => {
                if draft.data_format.is_some_and(|f| f.uses_schema_path()) {
                    draft.json_path = optional_text(value);
                }
            }
            Step::ManifestBucket => {
                draft.manifest_bucket = Some(require_not_blank(
                    value,
                    "You Must Provide a Bucket Name for Manifest File Storage",
                )?);
            }
            Step::ManifestPrefix => {
                draft.manifest_prefix = Some(require_not_blank(
                    value,
                    "You Must Provide a Prefix for Manifests",
                )?);
            }
            Step::FailedManifestPrefix => {
                draft.failed_manifest_prefix = Some(require_not_blank(
                    value,
                    "You Must Provide a Prefix for Manifests",
                )?);
            }
            Step::AccessKey => draft.access_key = optional_text(value),
            Step::SecretKey => {
                if let Some(secret) = optional_text(value) {
                    draft.encrypted_secret_key = Some(encrypt_field(ctx, &secret).await?);
                }
            }
            Step::SuccessTopic => draft.success_topic = optional_text(value),
            Step::FailureTopic => draft.failure_topic = optional_text(value),
            Step::BatchSize => draft.batch_size = optional_int(value)?,
            Step::BatchSizeBytes => draft.batch_size_bytes = optional_int(value)?,
            Step::BatchTimeoutSecs => draft.batch_timeout_secs = optional_int(value)?,
            Step::CopyOptions => draft.copy_options = optional_text(value),
            Step::SymmetricKey => {
                if let Some(key) = optional_text(value) {
                    draft.encrypted_symmetric_key = Some(encrypt_field(ctx, &key).await?);
                }
            }
        }

        Ok(draft)
    }
}

fn optional_int(value: Option<&ScalarValue>) -> Result<Option<i64>, SetupError> {
    if is_blank(value) {
        Ok(None)
    } else {
        coerce_int(value).map(Some)
    }
}

/// Encrypt a secret with the region's encryptor and serialize it
async fn encrypt_field(ctx: &PipelineContext<'_>, plaintext: &str) -> Result<String, SetupError> {
    let clients = ctx
        .clients
        .as_ref()
        .ok_or_else(|| SetupError::internal("region clients requested before the region was set"))?;

    let envelope = clients.encryptor.encrypt(plaintext).await?;
    Ok(crypto::serialize(&envelope))
}
