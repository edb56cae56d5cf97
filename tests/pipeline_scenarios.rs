//! End-to-end loader scenarios against the in-memory doubles

use loader_setup::driver::run_loaders;
use loader_setup::input::SetupDocument;
use loader_setup::pipeline::run_pipeline;
use loader_setup::record::DataFormat;
use loader_setup::storage::backends::dynamodb::record_to_item;
use loader_setup::testing::mocks::MockClientFactory;
use loader_setup::testing::scenario_a_bundle;

#[tokio::test]
async fn test_single_csv_loader_is_stored() {
    let factory = MockClientFactory::new();

    let record = run_pipeline(&scenario_a_bundle(), &factory).await.unwrap();

    assert_eq!(record.s3_prefix, "mybucket/incoming");
    assert_eq!(record.region, "us-east-1");
    assert_eq!(record.data_format, DataFormat::Csv);
    assert_eq!(record.csv_delimiter.as_deref(), Some(","));

    let cluster = &record.load_clusters[0];
    assert_eq!(cluster.cluster_port, 5439);
    assert_ne!(cluster.connect_password, "secret");
    assert!(!cluster.connect_password.trim().is_empty());
    assert!(!cluster.use_ssl);

    let stored = factory.store().records().await;
    assert_eq!(stored, vec![record]);
    assert_eq!(factory.provisioner().table_calls(), 1);
    assert_eq!(
        factory.provisioner().event_sources(),
        vec![("mybucket".to_string(), Some("incoming/".to_string()))]
    );
}

#[tokio::test]
async fn test_invalid_format_loader_is_reported_and_skipped() {
    let document = SetupDocument::from_json_str(
        r#"{
            "region": "us-east-1",
            "manifestBucket": "mb",
            "manifestPrefix": "mp/",
            "failedManifestPrefix": "fmp/",
            "clusterEndpoint": "db.example.com",
            "clusterPort": 5439,
            "userName": "admin",
            "userPwd": "secret",
            "csvDelimiter": "|",
            "loaders": [
                {"s3Prefix": "s3://good/in/", "table": "good", "df": "csv"},
                {"s3Prefix": "s3://bad/in/", "table": "bad", "df": "xml"}
            ]
        }"#,
    )
    .unwrap();
    let factory = MockClientFactory::new();

    let report = run_loaders(&document, &factory).await.unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.rejected(), 1);
    assert!(!report.outcomes[1].succeeded());

    let stored = factory.store().records().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].s3_prefix, "good/in");
    assert_eq!(stored[0].csv_delimiter.as_deref(), Some("|"));
    assert_eq!(factory.provisioner().table_calls(), 1);
}

#[tokio::test]
async fn test_omitted_secret_key_leaves_no_attribute() {
    let factory = MockClientFactory::new();
    let mut bundle = scenario_a_bundle();
    bundle.insert("accessKey", "AKIAEXAMPLE");

    let record = run_pipeline(&bundle, &factory).await.unwrap();
    let item = record_to_item(&record).unwrap();

    assert!(item.contains_key("accessKeyForS3"));
    assert!(!item.contains_key("secretKeyForS3"));
}

#[tokio::test]
async fn test_optional_fields_are_carried_through() {
    let factory = MockClientFactory::new();
    let mut bundle = scenario_a_bundle();
    bundle.insert("clusterUseSSL", "Y");
    bundle.insert("truncateTable", true);
    bundle.insert("clusterDB", "analytics");
    bundle.insert("columnList", "a,b,c");
    bundle.insert("batchSize", 100i64);
    bundle.insert("batchTimeoutSecs", "300");
    bundle.insert("successTopic", "arn:aws:sns:us-east-1:123:ok");
    bundle.insert("copyOptions", "GZIP");
    bundle.insert("filenameFilter", ".*\\.csv");

    let record = run_pipeline(&bundle, &factory).await.unwrap();
    let cluster = &record.load_clusters[0];

    assert!(cluster.use_ssl);
    assert!(cluster.truncate_target);
    assert_eq!(cluster.cluster_db.as_deref(), Some("analytics"));
    assert_eq!(cluster.column_list.as_deref(), Some("a,b,c"));
    assert_eq!(record.batch_size, Some(100));
    assert_eq!(record.batch_timeout_secs, Some(300));
    assert!(record.batch_size_bytes.is_none());
    assert_eq!(record.success_topic.as_deref(), Some("arn:aws:sns:us-east-1:123:ok"));
    assert!(record.failure_topic.is_none());
    assert_eq!(record.copy_options.as_deref(), Some("GZIP"));
    assert_eq!(record.filename_filter.as_deref(), Some(".*\\.csv"));
}

#[tokio::test]
async fn test_loaders_in_different_regions_get_their_own_clients() {
    let document = SetupDocument::from_json_str(
        r#"{
            "s3Prefix": "s3://mybucket/incoming/",
            "clusterEndpoint": "db.example.com",
            "clusterPort": "5439",
            "userName": "admin",
            "userPwd": "secret",
            "table": "events",
            "df": "json",
            "manifestBucket": "mb",
            "manifestPrefix": "mp/",
            "failedManifestPrefix": "fmp/",
            "loaders": [
                {"region": "eu-west-1"},
                {"region": "US-WEST-2", "s3Prefix": "other"}
            ]
        }"#,
    )
    .unwrap();
    let factory = MockClientFactory::new();

    let report = run_loaders(&document, &factory).await.unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(
        factory.regions_requested(),
        vec!["eu-west-1".to_string(), "us-west-2".to_string()]
    );
    let regions: Vec<_> = report.records().map(|r| r.region.clone()).collect();
    assert_eq!(regions, vec!["eu-west-1", "us-west-2"]);
}
