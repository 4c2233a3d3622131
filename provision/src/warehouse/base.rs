use std::future::Future;

use crate::error::ProvisionResult;
use crate::types::{DatasetSpec, TableMetadata, TableSpec};

/// Trait for tabular warehouse services that can host provisioned datasets
/// and tables.
///
/// The existence checks carry the one contract worth preserving: `Ok(false)`
/// is returned precisely when the service reports the resource as not found,
/// while every other failure kind propagates as an error. Callers must never
/// treat a transport or permission failure as "does not exist".
pub trait WarehouseClient {
    /// Returns whether the dataset exists.
    fn dataset_exists(&self, dataset_id: &str)
    -> impl Future<Output = ProvisionResult<bool>> + Send;

    /// Creates the dataset with the placement configured on the descriptor.
    fn create_dataset(&self, spec: &DatasetSpec)
    -> impl Future<Output = ProvisionResult<()>> + Send;

    /// Returns whether the table exists within the dataset.
    fn table_exists(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> impl Future<Output = ProvisionResult<bool>> + Send;

    /// Creates the table with its schema and time partitioning.
    ///
    /// The description on the descriptor is NOT applied here; it is persisted
    /// through a separate [`WarehouseClient::update_table_description`] call.
    /// Returns the metadata the service echoed back for the created table.
    fn create_table(
        &self,
        spec: &TableSpec,
    ) -> impl Future<Output = ProvisionResult<TableMetadata>> + Send;

    /// Updates the description of an existing table.
    ///
    /// Returns the metadata the service echoed back after the update.
    fn update_table_description(
        &self,
        dataset_id: &str,
        table_id: &str,
        description: &str,
    ) -> impl Future<Output = ProvisionResult<TableMetadata>> + Send;
}
