use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, ProvisionResult};
use crate::types::{DatasetSpec, TableMetadata, TableSpec};
use crate::warehouse::WarehouseClient;

#[derive(Debug, Clone)]
struct StoredTable {
    description: Option<String>,
    partition_field: Option<String>,
}

#[derive(Debug)]
struct Inner {
    datasets: HashMap<String, String>,
    tables: HashMap<(String, String), StoredTable>,
    dataset_create_calls: Vec<DatasetSpec>,
    table_create_calls: Vec<TableSpec>,
    description_update_calls: Vec<(String, String, String)>,
    injected_error: Option<ErrorKind>,
    echoed_table_id: Option<String>,
    echoed_description: Option<String>,
}

/// In-memory warehouse service for testing and development purposes.
///
/// [`MemoryWarehouse`] keeps dataset and table state in memory and records
/// every call made against it. The metadata echoed back from creations and
/// updates can be overridden to simulate a service that persists something
/// other than what was requested. All state is lost when the process
/// terminates.
#[derive(Debug, Clone)]
pub struct MemoryWarehouse {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryWarehouse {
    /// Creates a new empty memory warehouse.
    pub fn new() -> Self {
        let inner = Inner {
            datasets: HashMap::new(),
            tables: HashMap::new(),
            dataset_create_calls: Vec::new(),
            table_create_calls: Vec::new(),
            description_update_calls: Vec::new(),
            injected_error: None,
            echoed_table_id: None,
            echoed_description: None,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Seeds a dataset as pre-existing.
    pub async fn add_dataset(&self, name: impl Into<String>, location: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.datasets.insert(name.into(), location.into());
    }

    /// Seeds a table as pre-existing within a dataset.
    pub async fn add_table(
        &self,
        dataset: impl Into<String>,
        table: impl Into<String>,
        description: Option<String>,
        partition_field: Option<String>,
    ) {
        let mut inner = self.inner.lock().await;
        inner.tables.insert(
            (dataset.into(), table.into()),
            StoredTable {
                description,
                partition_field,
            },
        );
    }

    /// Returns the stored description of a table, if the table exists.
    pub async fn table_description(&self, dataset: &str, table: &str) -> Option<String> {
        let inner = self.inner.lock().await;
        inner
            .tables
            .get(&(dataset.to_owned(), table.to_owned()))
            .and_then(|stored| stored.description.clone())
    }

    /// Returns a copy of all dataset creation calls received so far.
    pub async fn dataset_create_calls(&self) -> Vec<DatasetSpec> {
        let inner = self.inner.lock().await;
        inner.dataset_create_calls.clone()
    }

    /// Returns a copy of all table creation calls received so far.
    pub async fn table_create_calls(&self) -> Vec<TableSpec> {
        let inner = self.inner.lock().await;
        inner.table_create_calls.clone()
    }

    /// Returns a copy of all description update calls received so far, as
    /// `(dataset, table, description)` triples.
    pub async fn description_update_calls(&self) -> Vec<(String, String, String)> {
        let inner = self.inner.lock().await;
        inner.description_update_calls.clone()
    }

    /// Makes the next call fail with an error of the given kind.
    pub async fn inject_error(&self, kind: ErrorKind) {
        let mut inner = self.inner.lock().await;
        inner.injected_error = Some(kind);
    }

    /// Makes creations and updates echo back the given table id instead of
    /// the requested one.
    pub async fn override_echoed_table_id(&self, table_id: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.echoed_table_id = Some(table_id.into());
    }

    /// Makes description updates echo back the given description instead of
    /// the persisted one.
    pub async fn override_echoed_description(&self, description: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.echoed_description = Some(description.into());
    }
}

impl Default for MemoryWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl WarehouseClient for MemoryWarehouse {
    async fn dataset_exists(&self, dataset_id: &str) -> ProvisionResult<bool> {
        let mut inner = self.inner.lock().await;

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected warehouse failure");
        }

        Ok(inner.datasets.contains_key(dataset_id))
    }

    async fn create_dataset(&self, spec: &DatasetSpec) -> ProvisionResult<()> {
        let mut inner = self.inner.lock().await;
        inner.dataset_create_calls.push(spec.clone());

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected warehouse failure");
        }

        info!("creating in-memory dataset {}", spec.name);

        inner
            .datasets
            .insert(spec.name.clone(), spec.location.clone());

        Ok(())
    }

    async fn table_exists(&self, dataset_id: &str, table_id: &str) -> ProvisionResult<bool> {
        let mut inner = self.inner.lock().await;

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected warehouse failure");
        }

        Ok(inner
            .tables
            .contains_key(&(dataset_id.to_owned(), table_id.to_owned())))
    }

    async fn create_table(&self, spec: &TableSpec) -> ProvisionResult<TableMetadata> {
        let mut inner = self.inner.lock().await;
        inner.table_create_calls.push(spec.clone());

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected warehouse failure");
        }

        info!("creating in-memory table {}.{}", spec.dataset.name, spec.name);

        let stored = StoredTable {
            description: None,
            partition_field: Some(spec.partition_column.clone()),
        };
        inner
            .tables
            .insert((spec.dataset.name.clone(), spec.name.clone()), stored.clone());

        let table_id = inner
            .echoed_table_id
            .clone()
            .unwrap_or_else(|| spec.name.clone());

        Ok(TableMetadata {
            table_id,
            description: stored.description,
            partition_field: stored.partition_field,
        })
    }

    async fn update_table_description(
        &self,
        dataset_id: &str,
        table_id: &str,
        description: &str,
    ) -> ProvisionResult<TableMetadata> {
        let mut inner = self.inner.lock().await;
        inner.description_update_calls.push((
            dataset_id.to_owned(),
            table_id.to_owned(),
            description.to_owned(),
        ));

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected warehouse failure");
        }

        let key = (dataset_id.to_owned(), table_id.to_owned());
        let Some(stored) = inner.tables.get_mut(&key) else {
            bail!(
                ErrorKind::WarehouseRequestFailed,
                "Table not found for description update"
            );
        };
        stored.description = Some(description.to_owned());
        let partition_field = stored.partition_field.clone();

        let echoed_table_id = inner
            .echoed_table_id
            .clone()
            .unwrap_or_else(|| table_id.to_owned());
        let echoed_description = inner
            .echoed_description
            .clone()
            .unwrap_or_else(|| description.to_owned());

        Ok(TableMetadata {
            table_id: echoed_table_id,
            description: Some(echoed_description),
            partition_field,
        })
    }
}
