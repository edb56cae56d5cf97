//! Multi-loader driver
//!
//! Runs the pipeline once per loader, sequentially. A loader that fails
//! validation is recorded and the run moves on; any other error stops the
//! run immediately.

use tracing::{info, warn};

use crate::clients::ClientFactory;
use crate::error::SetupError;
use crate::input::{keys, SetupDocument};
use crate::pipeline::run_pipeline;
use crate::record::ConfigRecord;

#[derive(Debug)]
pub enum LoaderStatus {
    Configured(ConfigRecord),
    Rejected(SetupError),
}

/// What happened to one loader
#[derive(Debug)]
pub struct LoaderOutcome {
    /// 1-based position in the document
    pub index: usize,
    /// Prefix as written in the input, for reporting
    pub prefix: String,
    pub status: LoaderStatus,
}

impl LoaderOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, LoaderStatus::Configured(_))
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<LoaderOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Records that were written, in loader order
    pub fn records(&self) -> impl Iterator<Item = &ConfigRecord> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            LoaderStatus::Configured(record) => Some(record),
            LoaderStatus::Rejected(_) => None,
        })
    }
}

/// Configure every loader in the document
pub async fn run_loaders(
    document: &SetupDocument,
    factory: &dyn ClientFactory,
) -> Result<RunReport, SetupError> {
    let bundles = document.loader_bundles();
    let mut report = RunReport::default();

    for (position, bundle) in bundles.iter().enumerate() {
        let index = position + 1;
        let prefix = bundle.display_value(keys::S3_PREFIX);

        println!(
            "Configuring loader for prefix {} into table {} @ {}",
            prefix,
            bundle.display_value(keys::TABLE),
            bundle.display_value(keys::REGION)
        );

        let status = match run_pipeline(bundle, factory).await {
            Ok(record) => {
                info!("Loader {} configured as {}", index, record.s3_prefix);
                LoaderStatus::Configured(record)
            }
            Err(err) if !err.is_fatal() => {
                warn!("Loader {} rejected: {}", index, err.user_message());
                LoaderStatus::Rejected(err)
            }
            Err(err) => return Err(err),
        };

        report.outcomes.push(LoaderOutcome {
            index,
            prefix,
            status,
        });
    }

    for outcome in &report.outcomes {
        match &outcome.status {
            LoaderStatus::Configured(_) => {
                println!("Loader {} ({}): configured", outcome.index, outcome.prefix)
            }
            LoaderStatus::Rejected(err) => println!(
                "Loader {} ({}): failed - {}",
                outcome.index,
                outcome.prefix,
                err.user_message()
            ),
        }
    }
    println!("Done");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::input::RawBundle;
    use crate::testing::mocks::MockClientFactory;
    use crate::testing::scenario_a_bundle;

    fn two_loader_document(second_format: &str) -> SetupDocument {
        let mut base = scenario_a_bundle();
        base.insert("manifestBucket", "shared-manifests");

        let first: RawBundle = [("s3Prefix", "s3://first/in/"), ("table", "first_events")]
            .into_iter()
            .collect();
        let second: RawBundle = [
            ("s3Prefix", "s3://second/in/"),
            ("table", "second_events"),
            ("df", second_format),
        ]
        .into_iter()
        .collect();

        SetupDocument {
            base,
            loaders: Some(vec![first, second]),
        }
    }

    #[tokio::test]
    async fn test_invalid_loader_does_not_stop_the_next() {
        let factory = MockClientFactory::new();
        let document = two_loader_document("xml");

        let report = run_loaders(&document, &factory).await.unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.rejected(), 1);
        assert!(report.outcomes[0].succeeded());
        assert_eq!(report.outcomes[1].prefix, "s3://second/in/");

        let written = factory.store().records().await;
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].s3_prefix, "first/in");
        assert_eq!(written[0].manifest_bucket, "shared-manifests");
    }

    #[tokio::test]
    async fn test_each_loader_gets_a_fresh_batch_id() {
        let factory = MockClientFactory::new();
        let report = run_loaders(&two_loader_document("json"), &factory)
            .await
            .unwrap();

        let ids: Vec<_> = report.records().map(|r| r.current_batch).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_all_rejected_still_completes_the_run() {
        let factory = MockClientFactory::new();
        let mut document = two_loader_document("xml");
        document.base.insert("df", "xml");

        let report = run_loaders(&document, &factory).await.unwrap();

        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.rejected(), 2);
        assert!(factory.store().records().await.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_region_stops_before_later_loaders() {
        let factory = MockClientFactory::new();
        let mut document = two_loader_document("csv");
        if let Some(loaders) = document.loaders.as_mut() {
            loaders[0].insert("region", "mars-1");
        }

        let err = run_loaders(&document, &factory).await.unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(err.code(), ErrorCode::REGION_NOT_SUPPORTED);
        assert_eq!(err.exit_code(), 7);
        assert!(factory.regions_requested().is_empty());
        assert!(factory.store().records().await.is_empty());
    }

    #[tokio::test]
    async fn test_fatal_error_stops_the_run() {
        let factory = MockClientFactory::builder().fail_writes().build();

        let err = run_loaders(&two_loader_document("csv"), &factory)
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(factory.encryptor().calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_loader_list_succeeds_with_nothing_written() {
        let factory = MockClientFactory::new();
        let document = SetupDocument {
            base: scenario_a_bundle(),
            loaders: Some(Vec::new()),
        };

        let report = run_loaders(&document, &factory).await.unwrap();
        assert!(report.outcomes.is_empty());
        assert!(factory.store().records().await.is_empty());
    }
}
