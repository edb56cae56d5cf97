//! Testing utilities and fixtures
//!
//! In-memory doubles for the key service, store and provisioner, plus the
//! sample inputs the unit and integration tests share.

pub mod mocks;

use crate::input::RawBundle;
use crate::record::{ConfigRecord, DataFormat, LoadCluster};
use uuid::Uuid;

/// A complete single-loader CSV bundle
pub fn scenario_a_bundle() -> RawBundle {
    [
        ("region", "us-east-1"),
        ("s3Prefix", "s3://mybucket/incoming/"),
        ("clusterEndpoint", "db.example.com"),
        ("clusterPort", "5439"),
        ("userName", "admin"),
        ("userPwd", "secret"),
        ("table", "events"),
        ("df", "csv"),
        ("csvDelimiter", ","),
        ("manifestBucket", "mb"),
        ("manifestPrefix", "mp/"),
        ("failedManifestPrefix", "fmp/"),
    ]
    .into_iter()
    .collect()
}

/// A valid CSV record for `s3_prefix` with a fresh batch id
pub fn sample_record(s3_prefix: &str) -> ConfigRecord {
    ConfigRecord {
        current_batch: Uuid::new_v4(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        region: "us-east-1".to_string(),
        s3_prefix: s3_prefix.to_string(),
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
        batch_size: None,
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
            connect_password: "bW9jay1jaXBoZXJ0ZXh0LTE=".to_string(),
        }],
    }
}
