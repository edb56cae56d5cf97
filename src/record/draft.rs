//! In-progress configuration record
//!
//! The pipeline fills a [`ConfigDraft`] field by field. Only
//! [`ConfigDraft::into_record`] produces a [`ConfigRecord`], so an incomplete
//! draft can never reach the store.

use super::{ConfigRecord, DataFormat, LoadCluster};
use crate::error::{ErrorCode, SetupError};
use uuid::Uuid;

/// Cluster fields gathered so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterDraft {
    pub endpoint: Option<String>,
    pub port: Option<i64>,
    pub use_ssl: bool,
    pub database: Option<String>,
    pub target_table: Option<String>,
    pub column_list: Option<String>,
    pub truncate_target: bool,
    pub user: Option<String>,
    pub encrypted_password: Option<String>,
}

/// Configuration fields gathered so far
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDraft {
    pub current_batch: Uuid,
    pub version: String,
    pub region: Option<String>,
    pub s3_prefix: Option<String>,
    pub filename_filter: Option<String>,
    pub data_format: Option<DataFormat>,
    pub csv_delimiter: Option<String>,
    pub json_path: Option<String>,
    pub manifest_bucket: Option<String>,
    pub manifest_prefix: Option<String>,
    pub failed_manifest_prefix: Option<String>,
    pub access_key: Option<String>,
    pub encrypted_secret_key: Option<String>,
    pub success_topic: Option<String>,
    pub failure_topic: Option<String>,
    pub batch_size: Option<i64>,
    pub batch_size_bytes: Option<i64>,
    pub batch_timeout_secs: Option<i64>,
    pub copy_options: Option<String>,
    pub encrypted_symmetric_key: Option<String>,
    pub cluster: ClusterDraft,
}

impl Default for ConfigDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDraft {
    /// Empty draft with a fresh batch identifier and the tool version
    pub fn new() -> Self {
        Self {
            current_batch: Uuid::new_v4(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            region: None,
            s3_prefix: None,
            filename_filter: None,
            data_format: None,
            csv_delimiter: None,
            json_path: None,
            manifest_bucket: None,
            manifest_prefix: None,
            failed_manifest_prefix: None,
            access_key: None,
            encrypted_secret_key: None,
            success_topic: None,
            failure_topic: None,
            batch_size: None,
            batch_size_bytes: None,
            batch_timeout_secs: None,
            copy_options: None,
            encrypted_symmetric_key: None,
            cluster: ClusterDraft::default(),
        }
    }

    /// Convert into a complete record, failing on the first missing
    /// required field
    pub fn into_record(self) -> Result<ConfigRecord, SetupError> {
        let cluster = self.cluster;

        Ok(ConfigRecord {
            current_batch: self.current_batch,
            version: self.version,
            region: required(self.region, "region")?,
            s3_prefix: required(self.s3_prefix, "s3Prefix")?,
            filename_filter: self.filename_filter,
            data_format: required(self.data_format, "dataFormat")?,
            csv_delimiter: self.csv_delimiter,
            json_path: self.json_path,
            manifest_bucket: required(self.manifest_bucket, "manifestBucket")?,
            manifest_prefix: required(self.manifest_prefix, "manifestKey")?,
            failed_manifest_prefix: required(self.failed_manifest_prefix, "failedManifestKey")?,
            access_key: self.access_key,
            secret_key: self.encrypted_secret_key,
            success_topic: self.success_topic,
            failure_topic: self.failure_topic,
            batch_size: self.batch_size,
            batch_size_bytes: self.batch_size_bytes,
            batch_timeout_secs: self.batch_timeout_secs,
            copy_options: self.copy_options,
            master_symmetric_key: self.encrypted_symmetric_key,
            load_clusters: vec![LoadCluster {
                cluster_endpoint: required(cluster.endpoint, "clusterEndpoint")?,
                cluster_port: required(cluster.port, "clusterPort")?,
                use_ssl: cluster.use_ssl,
                cluster_db: cluster.database,
                target_table: required(cluster.target_table, "targetTable")?,
                column_list: cluster.column_list,
                truncate_target: cluster.truncate_target,
                connect_user: required(cluster.user, "connectUser")?,
                connect_password: required(cluster.encrypted_password, "connectPassword")?,
            }],
        })
    }
}

fn required<T>(value: Option<T>, attribute: &str) -> Result<T, SetupError> {
    value.ok_or_else(|| {
        SetupError::validation_with_code(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            format!("record is missing required attribute {}", attribute),
            Some(attribute.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ConfigDraft {
        let mut draft = ConfigDraft::new();
        draft.region = Some("us-east-1".to_string());
        draft.s3_prefix = Some("mybucket/incoming".to_string());
        draft.data_format = Some(DataFormat::Json);
        draft.manifest_bucket = Some("mb".to_string());
        draft.manifest_prefix = Some("mp/".to_string());
        draft.failed_manifest_prefix = Some("fmp/".to_string());
        draft.cluster.endpoint = Some("db.example.com".to_string());
        draft.cluster.port = Some(5439);
        draft.cluster.target_table = Some("events".to_string());
        draft.cluster.user = Some("admin".to_string());
        draft.cluster.encrypted_password = Some("Y2lwaGVy".to_string());
        draft
    }

    #[test]
    fn test_new_drafts_get_distinct_batch_ids() {
        let a = ConfigDraft::new();
        let b = ConfigDraft::new();
        assert_ne!(a.current_batch, b.current_batch);
        assert_eq!(a.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_complete_draft_converts() {
        let draft = complete_draft();
        let batch = draft.current_batch;
        let record = draft.into_record().unwrap();

        assert_eq!(record.current_batch, batch);
        assert_eq!(record.load_clusters.len(), 1);
        assert_eq!(record.load_clusters[0].cluster_port, 5439);
        assert!(record.secret_key.is_none());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut draft = complete_draft();
        draft.cluster.encrypted_password = None;

        let err = draft.into_record().unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_REQUIRED_FIELD);
        assert!(err.user_message().contains("connectPassword"));
    }
}
