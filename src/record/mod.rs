//! Configuration record persisted for each loader
//!
//! Attribute names match what the batch loader function reads back from the
//! configuration table, which is why several Rust field names are renamed.

pub mod draft;

pub use draft::{ClusterDraft, ConfigDraft};

use serde::Serialize;
use uuid::Uuid;

/// Regions the loader is deployed to
pub const SUPPORTED_REGIONS: [&str; 10] = [
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "eu-central-1",
    "eu-west-1",
    "sa-east-1",
    "us-east-1",
    "us-west-1",
    "us-west-2",
];

/// Format of the files landing under the watched prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    Csv,
    Json,
    Avro,
}

impl DataFormat {
    /// Accepted spellings, already upper-cased
    pub const ALLOWED: [&'static str; 3] = ["CSV", "JSON", "AVRO"];

    /// Parse an upper-cased format name
    pub fn from_normalized(value: &str) -> Option<Self> {
        match value {
            "CSV" => Some(Self::Csv),
            "JSON" => Some(Self::Json),
            "AVRO" => Some(Self::Avro),
            _ => None,
        }
    }

    /// Whether a field delimiter applies to this format
    pub fn uses_delimiter(&self) -> bool {
        matches!(self, Self::Csv)
    }

    /// Whether a JSONPaths/schema file applies to this format
    pub fn uses_schema_path(&self) -> bool {
        matches!(self, Self::Json | Self::Avro)
    }
}

/// Target cluster connection and load behaviour
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCluster {
    pub cluster_endpoint: String,
    pub cluster_port: i64,
    #[serde(rename = "useSSL")]
    pub use_ssl: bool,
    #[serde(rename = "clusterDB", skip_serializing_if = "Option::is_none")]
    pub cluster_db: Option<String>,
    pub target_table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_list: Option<String>,
    pub truncate_target: bool,
    pub connect_user: String,
    /// Serialized ciphertext, never the operator's password
    pub connect_password: String,
}

/// One complete loader configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub current_batch: Uuid,
    pub version: String,
    pub region: String,
    pub s3_prefix: String,
    #[serde(rename = "filenameFilterRegex", skip_serializing_if = "Option::is_none")]
    pub filename_filter: Option<String>,
    pub data_format: DataFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_delimiter: Option<String>,
    #[serde(rename = "jsonPath", skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    pub manifest_bucket: String,
    #[serde(rename = "manifestKey")]
    pub manifest_prefix: String,
    #[serde(rename = "failedManifestKey")]
    pub failed_manifest_prefix: String,
    #[serde(rename = "accessKeyForS3", skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(rename = "secretKeyForS3", skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(rename = "successTopicARN", skip_serializing_if = "Option::is_none")]
    pub success_topic: Option<String>,
    #[serde(rename = "failureTopicARN", skip_serializing_if = "Option::is_none")]
    pub failure_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_timeout_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_options: Option<String>,
    #[serde(rename = "masterSymmetricKey", skip_serializing_if = "Option::is_none")]
    pub master_symmetric_key: Option<String>,
    pub load_clusters: Vec<LoadCluster>,
}

impl ConfigRecord {
    /// Bucket and key prefix watched by this loader
    ///
    /// The prefix is `None` for bucket-only configurations and otherwise ends
    /// with `/` so object storage notifications match whole path segments.
    pub fn source_location(&self) -> (&str, Option<String>) {
        match self.s3_prefix.split_once('/') {
            Some((bucket, rest)) if !rest.is_empty() => (bucket, Some(format!("{}/", rest))),
            Some((bucket, _)) => (bucket, None),
            None => (self.s3_prefix.as_str(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ConfigRecord {
        ConfigRecord {
            current_batch: Uuid::nil(),
            version: "0.1.0".to_string(),
            region: "us-east-1".to_string(),
            s3_prefix: "mybucket/incoming".to_string(),
            filename_filter: None,
            data_format: DataFormat::Csv,
            csv_delimiter: Some(",".to_string()),
            json_path: None,
            manifest_bucket: "mb".to_string(),
            manifest_prefix: "mp/".to_string(),
            failed_manifest_prefix: "fmp/".to_string(),
            access_key: None,
            secret_key: None,
            success_topic: None,
            failure_topic: None,
            batch_size: Some(100),
            batch_size_bytes: None,
            batch_timeout_secs: None,
            copy_options: None,
            master_symmetric_key: None,
            load_clusters: vec![LoadCluster {
                cluster_endpoint: "db.example.com".to_string(),
                cluster_port: 5439,
                use_ssl: true,
                cluster_db: None,
                target_table: "events".to_string(),
                column_list: None,
                truncate_target: false,
                connect_user: "admin".to_string(),
                connect_password: "Y2lwaGVy".to_string(),
            }],
        }
    }

    #[test]
    fn test_attribute_names() {
        let value = serde_json::to_value(sample_record()).unwrap();

        assert_eq!(value["s3Prefix"], "mybucket/incoming");
        assert_eq!(value["dataFormat"], "CSV");
        assert_eq!(value["csvDelimiter"], ",");
        assert_eq!(value["manifestKey"], "mp/");
        assert_eq!(value["failedManifestKey"], "fmp/");
        assert_eq!(value["batchSize"], 100);
        assert_eq!(value["currentBatch"], Uuid::nil().to_string());

        let cluster = &value["loadClusters"][0];
        assert_eq!(cluster["clusterPort"], 5439);
        assert_eq!(cluster["useSSL"], true);
        assert_eq!(cluster["truncateTarget"], false);
        assert_eq!(cluster["connectUser"], "admin");
    }

    #[test]
    fn test_unset_optionals_are_absent() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "jsonPath",
            "secretKeyForS3",
            "accessKeyForS3",
            "masterSymmetricKey",
            "filenameFilterRegex",
            "batchSizeBytes",
        ] {
            assert!(!object.contains_key(key), "{} should be absent", key);
        }
        assert!(!value["loadClusters"][0]
            .as_object()
            .unwrap()
            .contains_key("clusterDB"));
    }

    #[test]
    fn test_source_location() {
        let mut record = sample_record();
        assert_eq!(
            record.source_location(),
            ("mybucket", Some("incoming/".to_string()))
        );

        record.s3_prefix = "mybucket".to_string();
        assert_eq!(record.source_location(), ("mybucket", None));

        record.s3_prefix = "mybucket/a/b".to_string();
        assert_eq!(record.source_location(), ("mybucket", Some("a/b/".to_string())));
    }

    #[test]
    fn test_data_format_gates() {
        assert!(DataFormat::Csv.uses_delimiter());
        assert!(!DataFormat::Csv.uses_schema_path());
        assert!(DataFormat::Json.uses_schema_path());
        assert!(DataFormat::Avro.uses_schema_path());
        assert_eq!(DataFormat::from_normalized("AVRO"), Some(DataFormat::Avro));
        assert_eq!(DataFormat::from_normalized("XML"), None);
    }
}
