//! Idempotent provisioning of storage buckets and warehouse resources.
//!
//! Every operation follows the same shape: check whether the resource exists,
//! create it only when it does not, and report which of the two happened.
//! Running the same operation twice is safe; the second run observes the
//! resource and leaves it untouched.

use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, ProvisionResult};
use crate::storage::StorageClient;
use crate::types::{BucketSpec, DatasetSpec, TableSpec};
use crate::warehouse::WarehouseClient;

/// Idempotent provisioner over a storage service and a warehouse service.
///
/// The provisioner owns no resource state of its own; the remote services are
/// the source of truth and every `ensure_*` call re-checks them. Each call
/// returns `Ok(true)` when it created the resource and `Ok(false)` when the
/// resource already existed.
#[derive(Debug)]
pub struct Provisioner<S, W> {
    storage: S,
    warehouse: W,
}

impl<S, W> Provisioner<S, W>
where
    S: StorageClient,
    W: WarehouseClient,
{
    /// Creates a provisioner over the given services.
    pub fn new(storage: S, warehouse: W) -> Self {
        Self { storage, warehouse }
    }

    /// Ensures the bucket exists, creating it when absent.
    ///
    /// Returns `Ok(true)` when the bucket was created by this call and
    /// `Ok(false)` when it already existed. The location on the descriptor is
    /// applied only at creation time; an existing bucket is never reconciled.
    pub async fn ensure_bucket(&self, spec: &BucketSpec) -> ProvisionResult<bool> {
        if self.storage.bucket_exists(&spec.name).await? {
            info!("Bucket already exists: {}", spec.name);

            return Ok(false);
        }

        self.storage.create_bucket(spec).await?;
        info!("Created a new bucket: {}", spec.name);

        Ok(true)
    }

    /// Ensures the dataset exists, creating it when absent.
    ///
    /// Returns `Ok(true)` when the dataset was created by this call and
    /// `Ok(false)` when it already existed.
    pub async fn ensure_dataset(&self, spec: &DatasetSpec) -> ProvisionResult<bool> {
        if self.warehouse.dataset_exists(&spec.name).await? {
            info!("Dataset already exists: {}", spec.name);

            return Ok(false);
        }

        self.warehouse.create_dataset(spec).await?;
        info!("Created new dataset: {}", spec.name);

        Ok(true)
    }

    /// Ensures the table exists within its dataset, creating both when absent.
    ///
    /// The dataset is ensured first, so a table can be provisioned into a
    /// project where nothing exists yet. When the table is created, its
    /// description is persisted through a follow-up update and the metadata
    /// echoed back by the service is verified against the descriptor. A run
    /// interrupted between dataset and table creation is resumed by the next
    /// invocation.
    ///
    /// Returns `Ok(true)` when the table was created by this call and
    /// `Ok(false)` when it already existed.
    pub async fn ensure_table(&self, spec: &TableSpec) -> ProvisionResult<bool> {
        self.ensure_dataset(&spec.dataset).await?;

        if self
            .warehouse
            .table_exists(&spec.dataset.name, &spec.name)
            .await?
        {
            info!("Table already exists: {}", spec.name);

            return Ok(false);
        }

        let created = self.warehouse.create_table(spec).await?;
        if created.table_id != spec.name {
            bail!(
                ErrorKind::PostconditionViolation,
                "Created table id does not match the requested name",
                format!(
                    "requested `{}`, service echoed `{}`",
                    spec.name, created.table_id
                )
            );
        }

        let updated = self
            .warehouse
            .update_table_description(&spec.dataset.name, &spec.name, &spec.description)
            .await?;
        if updated.description.as_deref() != Some(spec.description.as_str()) {
            bail!(
                ErrorKind::PostconditionViolation,
                "Updated table description does not match the requested description",
                format!(
                    "requested `{}`, service echoed `{:?}`",
                    spec.description, updated.description
                )
            );
        }

        let partition_field = created
            .partition_field
            .as_deref()
            .unwrap_or(&spec.partition_column);
        info!("Created empty table partitioned on column: {}", partition_field);

        Ok(true)
    }
}
