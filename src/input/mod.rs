//! Setup document input
//!
//! Structured input replaces the interactive prompts: a document is read once,
//! split into per-loader bundles, and each bundle feeds one pipeline run.

pub mod bundle;
pub mod document;

pub use bundle::{RawBundle, ScalarValue};
pub use document::{load_document, SetupDocument, DEFAULT_CONFIG_PATH};

/// Field names recognised in a setup document
pub mod keys {
    pub const LOADERS: &str = "loaders";
    pub const REGION: &str = "region";
    pub const S3_PREFIX: &str = "s3Prefix";
    pub const FILENAME_FILTER: &str = "filenameFilter";
    pub const CLUSTER_ENDPOINT: &str = "clusterEndpoint";
    pub const CLUSTER_PORT: &str = "clusterPort";
    pub const CLUSTER_USE_SSL: &str = "clusterUseSSL";
    pub const CLUSTER_DB: &str = "clusterDB";
    pub const TABLE: &str = "table";
    pub const COLUMN_LIST: &str = "columnList";
    pub const TRUNCATE_TABLE: &str = "truncateTable";
    pub const USER_NAME: &str = "userName";
    pub const USER_PWD: &str = "userPwd";
    pub const DATA_FORMAT: &str = "df";
    pub const CSV_DELIMITER: &str = "csvDelimiter";
    pub const JSON_PATHS: &str = "jsonPaths";
    pub const MANIFEST_BUCKET: &str = "manifestBucket";
    pub const MANIFEST_PREFIX: &str = "manifestPrefix";
    pub const FAILED_MANIFEST_PREFIX: &str = "failedManifestPrefix";
    pub const ACCESS_KEY: &str = "accessKey";
    pub const SECRET_KEY: &str = "secretKey";
    pub const SUCCESS_TOPIC: &str = "successTopic";
    pub const FAILURE_TOPIC: &str = "failureTopic";
    pub const BATCH_SIZE: &str = "batchSize";
    pub const BATCH_SIZE_BYTES: &str = "batchSizeBytes";
    pub const BATCH_TIMEOUT_SECS: &str = "batchTimeoutSecs";
    pub const COPY_OPTIONS: &str = "copyOptions";
    pub const SYMMETRIC_KEY: &str = "symmetricKey";
}
