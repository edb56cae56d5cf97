//! DynamoDB config store

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::record::ConfigRecord;
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::ConfigStore,
};

/// Writes records into the configuration table, one item per prefix
pub struct DynamoConfigStore {
    client: Client,
    table: String,
}

impl DynamoConfigStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl ConfigStore for DynamoConfigStore {
    async fn put_config(&self, record: &ConfigRecord) -> StorageResult<()> {
        debug!("Putting configuration for {} into {}", record.s3_prefix, self.table);

        let item = record_to_item(record)?;
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StorageError::write(&self.table, DisplayErrorContext(&e)))?;

        Ok(())
    }
}

/// Render a record as a DynamoDB item
///
/// Goes through the record's JSON form so attribute names stay identical to
/// the serde renames. Unset optional attributes are absent, not `NULL`.
pub fn record_to_item(record: &ConfigRecord) -> StorageResult<HashMap<String, AttributeValue>> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .filter_map(|(key, value)| to_attribute_value(value).map(|attr| (key, attr)))
            .collect()),
        _ => Err(StorageError::serialization(
            "configuration record did not serialize to an object",
        )),
    }
}

fn to_attribute_value(value: Value) -> Option<AttributeValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(AttributeValue::Bool(b)),
        Value::Number(n) => Some(AttributeValue::N(n.to_string())),
        Value::String(s) => Some(AttributeValue::S(s)),
        Value::Array(items) => Some(AttributeValue::L(
            items.into_iter().filter_map(to_attribute_value).collect(),
        )),
        Value::Object(fields) => Some(AttributeValue::M(
            fields
                .into_iter()
                .filter_map(|(key, value)| to_attribute_value(value).map(|attr| (key, attr)))
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_record;

    #[test]
    fn test_item_attribute_types() {
        let record = sample_record("mybucket/incoming");
        let item = record_to_item(&record).unwrap();

        assert_eq!(
            item.get("s3Prefix"),
            Some(&AttributeValue::S("mybucket/incoming".to_string()))
        );
        assert_eq!(
            item.get("dataFormat"),
            Some(&AttributeValue::S("CSV".to_string()))
        );
        assert_eq!(
            item.get("currentBatch"),
            Some(&AttributeValue::S(record.current_batch.to_string()))
        );

        let Some(AttributeValue::L(clusters)) = item.get("loadClusters") else {
            panic!("loadClusters should be a list");
        };
        assert_eq!(clusters.len(), 1);
        let AttributeValue::M(cluster) = &clusters[0] else {
            panic!("cluster entry should be a map");
        };
        assert_eq!(
            cluster.get("clusterPort"),
            Some(&AttributeValue::N("5439".to_string()))
        );
        assert_eq!(cluster.get("useSSL"), Some(&AttributeValue::Bool(true)));
    }

    #[test]
    fn test_unset_attributes_are_not_written() {
        let item = record_to_item(&sample_record("mybucket")).unwrap();

        assert!(!item.contains_key("secretKeyForS3"));
        assert!(!item.contains_key("jsonPath"));
        assert!(item.values().all(|v| !matches!(v, AttributeValue::Null(_))));
    }
}
