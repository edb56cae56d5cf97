//! AWS provisioning for the loader's supporting resources
//!
//! Creates the DynamoDB tables the loader function uses and wires the source
//! bucket's object-created events to the function. Every step tolerates the
//! resource already existing.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_s3::types::{
    Event, FilterRule, FilterRuleName, LambdaFunctionConfiguration, NotificationConfiguration,
    NotificationConfigurationFilter, S3KeyFilter,
};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::storage::{
    error::{StorageError, StorageResult},
    traits::Provisioner,
};

const TABLE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const TABLE_POLL_ATTEMPTS: u32 = 60;
const OBJECT_CREATED_EVENT: &str = "s3:ObjectCreated:*";
const S3_PRINCIPAL: &str = "s3.amazonaws.com";

/// Names of the resources the loader function expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionTargets {
    pub config_table: String,
    pub batch_table: String,
    pub files_table: String,
    pub loader_function: String,
}

/// A table to create: name plus `(attribute, key type)` pairs
struct TableSpec<'a> {
    name: &'a str,
    keys: &'a [(&'a str, KeyType)],
}

pub struct AwsProvisioner {
    dynamodb: aws_sdk_dynamodb::Client,
    lambda: aws_sdk_lambda::Client,
    s3: aws_sdk_s3::Client,
    targets: ProvisionTargets,
}

impl AwsProvisioner {
    pub fn new(
        dynamodb: aws_sdk_dynamodb::Client,
        lambda: aws_sdk_lambda::Client,
        s3: aws_sdk_s3::Client,
        targets: ProvisionTargets,
    ) -> Self {
        Self {
            dynamodb,
            lambda,
            s3,
            targets,
        }
    }

    async fn ensure_table(&self, spec: &TableSpec<'_>) -> StorageResult<()> {
        match self
            .dynamodb
            .describe_table()
            .table_name(spec.name)
            .send()
            .await
        {
            Ok(_) => {
                debug!("Table {} exists", spec.name);
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if !service_err.is_resource_not_found_exception() {
                    return Err(StorageError::table(
                        spec.name,
                        DisplayErrorContext(&service_err),
                    ));
                }
                self.create_table(spec).await?;
            }
        }

        self.wait_until_active(spec.name).await
    }

    async fn create_table(&self, spec: &TableSpec<'_>) -> StorageResult<()> {
        info!("Creating table {}", spec.name);

        let mut request = self
            .dynamodb
            .create_table()
            .table_name(spec.name)
            .billing_mode(BillingMode::PayPerRequest);

        for (attribute, key_type) in spec.keys {
            let definition = AttributeDefinition::builder()
                .attribute_name(*attribute)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| StorageError::table(spec.name, e))?;
            let key = KeySchemaElement::builder()
                .attribute_name(*attribute)
                .key_type(key_type.clone())
                .build()
                .map_err(|e| StorageError::table(spec.name, e))?;
            request = request.attribute_definitions(definition).key_schema(key);
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_resource_in_use_exception() {
                    debug!("Table {} is already being created", spec.name);
                    Ok(())
                } else {
                    Err(StorageError::table(
                        spec.name,
                        DisplayErrorContext(&service_err),
                    ))
                }
            }
        }
    }

    async fn wait_until_active(&self, table: &str) -> StorageResult<()> {
        for _ in 0..TABLE_POLL_ATTEMPTS {
            let described = self
                .dynamodb
                .describe_table()
                .table_name(table)
                .send()
                .await
                .map_err(|e| StorageError::table(table, DisplayErrorContext(&e)))?;

            let status = described.table().and_then(|t| t.table_status());
            if status == Some(&TableStatus::Active) {
                return Ok(());
            }

            debug!("Waiting for table {} (status {:?})", table, status);
            tokio::time::sleep(TABLE_POLL_INTERVAL).await;
        }

        Err(StorageError::Timeout {
            table: table.to_string(),
            waited: TABLE_POLL_INTERVAL * TABLE_POLL_ATTEMPTS,
        })
    }

    /// ARN of the loader function, or `None` when it is not deployed
    async fn loader_function_arn(&self) -> StorageResult<Option<String>> {
        match self
            .lambda
            .get_function()
            .function_name(&self.targets.loader_function)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .configuration()
                .and_then(|c| c.function_arn())
                .map(str::to_string)),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    Ok(None)
                } else {
                    Err(StorageError::event_source(format!(
                        "GetFunction {} failed: {}",
                        self.targets.loader_function,
                        aws_sdk_lambda::error::DisplayErrorContext(&service_err)
                    )))
                }
            }
        }
    }

    async fn grant_invoke(&self, bucket: &str) -> StorageResult<()> {
        let statement_id = statement_id(&self.targets.loader_function, bucket);

        match self
            .lambda
            .add_permission()
            .function_name(&self.targets.loader_function)
            .statement_id(&statement_id)
            .action("lambda:InvokeFunction")
            .principal(S3_PRINCIPAL)
            .source_arn(format!("arn:aws:s3:::{}", bucket))
            .send()
            .await
        {
            Ok(_) => {
                info!("Granted {} permission to invoke {}", bucket, self.targets.loader_function);
                Ok(())
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_resource_conflict_exception() {
                    debug!("Invoke permission {} already present", statement_id);
                    Ok(())
                } else {
                    Err(StorageError::event_source(format!(
                        "AddPermission for {} failed: {}",
                        bucket,
                        aws_sdk_lambda::error::DisplayErrorContext(&service_err)
                    )))
                }
            }
        }
    }

    async fn add_notification(
        &self,
        function_arn: &str,
        bucket: &str,
        prefix: Option<&str>,
    ) -> StorageResult<()> {
        let existing = self
            .s3
            .get_bucket_notification_configuration()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                StorageError::event_source(format!(
                    "GetBucketNotificationConfiguration {} failed: {}",
                    bucket,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        let id = notification_id(&self.targets.loader_function, prefix);
        if existing
            .lambda_function_configurations()
            .iter()
            .any(|c| c.id() == Some(id.as_str()))
        {
            debug!("Notification {} already configured on {}", id, bucket);
            return Ok(());
        }

        let mut entry = LambdaFunctionConfiguration::builder()
            .id(&id)
            .lambda_function_arn(function_arn)
            .events(Event::from(OBJECT_CREATED_EVENT));
        if let Some(prefix) = prefix {
            entry = entry.filter(
                NotificationConfigurationFilter::builder()
                    .key(
                        S3KeyFilter::builder()
                            .filter_rules(
                                FilterRule::builder()
                                    .name(FilterRuleName::Prefix)
                                    .value(prefix)
                                    .build(),
                            )
                            .build(),
                    )
                    .build(),
            );
        }
        let entry = entry.build().map_err(StorageError::event_source)?;

        let mut lambda_configs = existing.lambda_function_configurations().to_vec();
        lambda_configs.push(entry);

        let configuration = NotificationConfiguration::builder()
            .set_lambda_function_configurations(Some(lambda_configs))
            .set_topic_configurations(Some(existing.topic_configurations().to_vec()))
            .set_queue_configurations(Some(existing.queue_configurations().to_vec()))
            .set_event_bridge_configuration(existing.event_bridge_configuration().cloned())
            .build();

        self.s3
            .put_bucket_notification_configuration()
            .bucket(bucket)
            .notification_configuration(configuration)
            .send()
            .await
            .map_err(|e| {
                StorageError::event_source(format!(
                    "PutBucketNotificationConfiguration {} failed: {}",
                    bucket,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        info!("Added notification {} on bucket {}", id, bucket);
        Ok(())
    }
}

#[async_trait]
impl Provisioner for AwsProvisioner {
    async fn ensure_tables(&self) -> StorageResult<()> {
        let tables = [
            TableSpec {
                name: &self.targets.config_table,
                keys: &[("s3Prefix", KeyType::Hash)],
            },
            TableSpec {
                name: &self.targets.batch_table,
                keys: &[("s3Prefix", KeyType::Hash), ("batchId", KeyType::Range)],
            },
            TableSpec {
                name: &self.targets.files_table,
                keys: &[("loadFile", KeyType::Hash)],
            },
        ];

        for spec in &tables {
            self.ensure_table(spec).await?;
        }
        Ok(())
    }

    async fn ensure_event_source(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<()> {
        let Some(function_arn) = self.loader_function_arn().await? else {
            warn!(
                "Loader function {} not found; skipping event notification for {}",
                self.targets.loader_function, bucket
            );
            return Ok(());
        };

        self.grant_invoke(bucket).await?;
        self.add_notification(&function_arn, bucket, prefix).await
    }
}

/// Permission statement ids allow only alphanumerics, `-` and `_`
fn statement_id(function: &str, bucket: &str) -> String {
    let raw = format!("{}-{}", function, bucket);
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect()
}

fn notification_id(function: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}-{}", function, prefix.trim_end_matches('/')),
        None => function.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_id_is_sanitized() {
        assert_eq!(
            statement_id("LambdaRedshiftLoader", "my.bucket"),
            "LambdaRedshiftLoader-my_bucket"
        );
        let long = "b".repeat(200);
        assert_eq!(statement_id("f", &long).len(), 100);
    }

    #[test]
    fn test_notification_id_per_prefix() {
        assert_eq!(
            notification_id("LambdaRedshiftLoader", Some("incoming/")),
            "LambdaRedshiftLoader-incoming"
        );
        assert_eq!(notification_id("LambdaRedshiftLoader", None), "LambdaRedshiftLoader");
    }
}
