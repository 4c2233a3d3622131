use provision::error::ErrorKind;
use provision::provisioner::Provisioner;
use provision::storage::memory::MemoryStorage;
use provision::types::{BucketSpec, ColumnMode, ColumnSchema, ColumnType, DatasetSpec, TableSpec};
use provision::warehouse::memory::MemoryWarehouse;
use telemetry::init_test_tracing;

fn orders_table_spec() -> TableSpec {
    TableSpec::new(
        DatasetSpec::new("analytics"),
        "orders",
        "Daily order snapshots",
        vec![
            ColumnSchema::new("order_id", ColumnType::String, ColumnMode::Required),
            ColumnSchema::new("amount", ColumnType::Numeric, ColumnMode::Nullable),
            ColumnSchema::new("ordered_at", ColumnType::Timestamp, ColumnMode::Required),
        ],
        "ordered_at",
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_bucket_is_idempotent() {
    init_test_tracing();

    let storage = MemoryStorage::new();
    let provisioner = Provisioner::new(storage.clone(), MemoryWarehouse::new());
    let spec = BucketSpec::new("raw-landing-zone");

    let created = provisioner.ensure_bucket(&spec).await.unwrap();
    assert!(created);

    let created = provisioner.ensure_bucket(&spec).await.unwrap();
    assert!(!created);

    assert_eq!(storage.create_calls().await.len(), 1);
    assert_eq!(storage.bucket_names().await, vec!["raw-landing-zone"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn bucket_exists_error_is_not_conflated_with_absence() {
    init_test_tracing();

    let storage = MemoryStorage::new();
    storage.inject_error(ErrorKind::StorageIoError).await;

    let provisioner = Provisioner::new(storage.clone(), MemoryWarehouse::new());
    let spec = BucketSpec::new("raw-landing-zone");

    let err = provisioner.ensure_bucket(&spec).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageIoError);

    // The failed existence check must not be treated as absence.
    assert!(storage.create_calls().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_dataset_is_idempotent() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = DatasetSpec::new("analytics");

    let created = provisioner.ensure_dataset(&spec).await.unwrap();
    assert!(created);

    let created = provisioner.ensure_dataset(&spec).await.unwrap();
    assert!(!created);

    assert_eq!(warehouse.dataset_create_calls().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_table_creates_dataset_table_and_description() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let created = provisioner.ensure_table(&spec).await.unwrap();
    assert!(created);

    assert_eq!(warehouse.dataset_create_calls().await.len(), 1);
    // The schema and partition column are passed through unmodified.
    assert_eq!(warehouse.table_create_calls().await, vec![spec]);
    assert_eq!(
        warehouse.description_update_calls().await,
        vec![(
            "analytics".to_string(),
            "orders".to_string(),
            "Daily order snapshots".to_string()
        )]
    );
    assert_eq!(
        warehouse.table_description("analytics", "orders").await,
        Some("Daily order snapshots".to_string())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_table_resumes_after_partial_provisioning() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    warehouse.add_dataset("analytics", "US").await;

    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let created = provisioner.ensure_table(&spec).await.unwrap();
    assert!(created);

    // The pre-existing dataset is observed, not recreated.
    assert!(warehouse.dataset_create_calls().await.is_empty());
    assert_eq!(warehouse.table_create_calls().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_table_is_noop_when_everything_exists() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    warehouse.add_dataset("analytics", "US").await;
    warehouse
        .add_table(
            "analytics",
            "orders",
            Some("Daily order snapshots".to_string()),
            Some("ordered_at".to_string()),
        )
        .await;

    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let created = provisioner.ensure_table(&spec).await.unwrap();
    assert!(!created);

    assert!(warehouse.table_create_calls().await.is_empty());
    assert!(warehouse.description_update_calls().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn mismatched_table_id_echo_fails_postcondition() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    warehouse.override_echoed_table_id("orders_v2").await;

    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let err = provisioner.ensure_table(&spec).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PostconditionViolation);

    // The description update never runs once the create echo is rejected.
    assert!(warehouse.description_update_calls().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn mismatched_description_echo_fails_postcondition() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    warehouse.override_echoed_description("stale description").await;

    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let err = provisioner.ensure_table(&spec).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PostconditionViolation);
}

#[tokio::test(flavor = "multi_thread")]
async fn warehouse_errors_propagate_from_exists_check() {
    init_test_tracing();

    let warehouse = MemoryWarehouse::new();
    warehouse.inject_error(ErrorKind::PermissionDenied).await;

    let provisioner = Provisioner::new(MemoryStorage::new(), warehouse.clone());
    let spec = orders_table_spec();

    let err = provisioner.ensure_table(&spec).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);

    assert!(warehouse.dataset_create_calls().await.is_empty());
    assert!(warehouse.table_create_calls().await.is_empty());
}
