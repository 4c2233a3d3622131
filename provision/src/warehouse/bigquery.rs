use gcp_bigquery_client::Client;
use gcp_bigquery_client::client_builder::ClientBuilder;
use gcp_bigquery_client::error::BQError;
use gcp_bigquery_client::model::dataset::Dataset;
use gcp_bigquery_client::model::table::Table;
use gcp_bigquery_client::model::table_field_schema::TableFieldSchema;
use gcp_bigquery_client::model::table_schema::TableSchema;
use gcp_bigquery_client::model::time_partitioning::TimePartitioning;
use gcp_bigquery_client::yup_oauth2::parse_service_account_key;
use secrecy::ExposeSecret;
use std::fmt;
use tracing::info;

use crate::config::WarehouseConfig;
use crate::error::{ErrorKind, ProvisionError, ProvisionResult};
use crate::provision_error;
use crate::types::{ColumnSchema, ColumnType, DatasetSpec, PartitionGranularity, TableMetadata, TableSpec};
use crate::warehouse::WarehouseClient;

/// A client for managing BigQuery datasets and tables.
///
/// This client covers the metadata surface only: existence checks, dataset
/// and table creation, and description updates. Auth, networking, and
/// persistence are delegated to the underlying BigQuery client library.
pub struct BigQueryWarehouse {
    project_id: String,
    client: Client,
}

impl BigQueryWarehouse {
    /// Creates a new [`BigQueryWarehouse`] from a configuration object.
    ///
    /// Chooses the authentication path from the configuration: endpoint
    /// overrides take precedence, then an inline service account key, and
    /// finally application default credentials.
    pub async fn from_config(config: WarehouseConfig) -> ProvisionResult<Self> {
        config.validate().map_err(|err| {
            provision_error!(
                ErrorKind::ConfigError,
                "Invalid warehouse configuration",
                err.to_string()
            )
        })?;

        match (&config.auth_base_url, &config.v2_base_url, &config.service_account_key) {
            (Some(auth_base_url), Some(v2_base_url), Some(sa_key)) => {
                Self::new_with_custom_urls(
                    config.project_id.clone(),
                    auth_base_url.clone(),
                    v2_base_url.clone(),
                    sa_key.expose_secret(),
                )
                .await
            }
            (_, _, Some(sa_key)) => {
                Self::new_with_key(config.project_id.clone(), sa_key.expose_secret()).await
            }
            _ => Self::new_with_adc(config.project_id).await,
        }
    }

    /// Creates a new [`BigQueryWarehouse`] from a Google Cloud service account
    /// key file.
    pub async fn new_with_key_path(
        project_id: String,
        sa_key_file: &str,
    ) -> ProvisionResult<BigQueryWarehouse> {
        let client = ClientBuilder::new()
            .build_from_service_account_key_file(sa_key_file)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(BigQueryWarehouse { project_id, client })
    }

    /// Creates a new [`BigQueryWarehouse`] from a Google Cloud service account
    /// key JSON string.
    pub async fn new_with_key(
        project_id: String,
        sa_key: &str,
    ) -> ProvisionResult<BigQueryWarehouse> {
        let sa_key = parse_service_account_key(sa_key)
            .map_err(BQError::from)
            .map_err(bq_error_to_provision_error)?;
        let client = ClientBuilder::new()
            .build_from_service_account_key(sa_key, false)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(BigQueryWarehouse { project_id, client })
    }

    /// Creates a new [`BigQueryWarehouse`] using application default
    /// credentials from the environment.
    pub async fn new_with_adc(project_id: String) -> ProvisionResult<BigQueryWarehouse> {
        let client = ClientBuilder::new()
            .build_from_application_default_credentials()
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(BigQueryWarehouse { project_id, client })
    }

    /// Creates a new [`BigQueryWarehouse`] from a service-account JSON key and
    /// allows overriding the BigQuery endpoint URL.
    ///
    /// This override is intended only for integration tests and local
    /// development against emulators or mock servers.
    pub async fn new_with_custom_urls(
        project_id: String,
        auth_base_url: String,
        v2_base_url: String,
        sa_key: &str,
    ) -> ProvisionResult<BigQueryWarehouse> {
        let sa_key = parse_service_account_key(sa_key)
            .map_err(BQError::from)
            .map_err(bq_error_to_provision_error)?;
        let client = ClientBuilder::new()
            .with_auth_base_url(auth_base_url)
            .with_v2_base_url(v2_base_url)
            .build_from_service_account_key(sa_key, false)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(BigQueryWarehouse { project_id, client })
    }
}

impl WarehouseClient for BigQueryWarehouse {
    async fn dataset_exists(&self, dataset_id: &str) -> ProvisionResult<bool> {
        let result = self.client.dataset().get(&self.project_id, dataset_id).await;

        match result {
            Ok(_) => Ok(true),
            Err(BQError::ResponseError { error }) if error.error.code == 404 => Ok(false),
            Err(err) => Err(bq_error_to_provision_error(err)),
        }
    }

    async fn create_dataset(&self, spec: &DatasetSpec) -> ProvisionResult<()> {
        info!(
            dataset = %spec.name,
            location = %spec.location,
            "creating dataset in bigquery"
        );

        let dataset = Dataset::new(&self.project_id, &spec.name).location(&spec.location);
        self.client
            .dataset()
            .create(dataset)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(())
    }

    async fn table_exists(&self, dataset_id: &str, table_id: &str) -> ProvisionResult<bool> {
        let result = self
            .client
            .table()
            .get(&self.project_id, dataset_id, table_id, None)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(BQError::ResponseError { error }) if error.error.code == 404 => Ok(false),
            Err(err) => Err(bq_error_to_provision_error(err)),
        }
    }

    async fn create_table(&self, spec: &TableSpec) -> ProvisionResult<TableMetadata> {
        info!(
            dataset = %spec.dataset.name,
            table = %spec.name,
            partition_column = %spec.partition_column,
            "creating table in bigquery"
        );

        let fields = spec.columns.iter().map(field_schema).collect();
        let partitioning = match spec.partition_granularity {
            PartitionGranularity::Day => TimePartitioning::per_day().field(&spec.partition_column),
        };

        let table = Table::new(
            &self.project_id,
            &spec.dataset.name,
            &spec.name,
            TableSchema::new(fields),
        )
        .time_partitioning(partitioning);

        let created = self
            .client
            .table()
            .create(table)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(table_metadata(&created))
    }

    async fn update_table_description(
        &self,
        dataset_id: &str,
        table_id: &str,
        description: &str,
    ) -> ProvisionResult<TableMetadata> {
        let mut table = self
            .client
            .table()
            .get(&self.project_id, dataset_id, table_id, None)
            .await
            .map_err(bq_error_to_provision_error)?;
        table.description = Some(description.to_owned());

        let updated = self
            .client
            .table()
            .update(&self.project_id, dataset_id, table_id, table)
            .await
            .map_err(bq_error_to_provision_error)?;

        Ok(table_metadata(&updated))
    }
}

impl fmt::Debug for BigQueryWarehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigQueryWarehouse")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Maps a [`ColumnSchema`] to a BigQuery field schema, carrying the mode over.
fn field_schema(column: &ColumnSchema) -> TableFieldSchema {
    let mut field = match column.typ {
        ColumnType::Bool => TableFieldSchema::bool(&column.name),
        ColumnType::Int64 => TableFieldSchema::integer(&column.name),
        ColumnType::Float64 => TableFieldSchema::float(&column.name),
        ColumnType::Numeric => TableFieldSchema::numeric(&column.name),
        ColumnType::String => TableFieldSchema::string(&column.name),
        ColumnType::Bytes => TableFieldSchema::bytes(&column.name),
        ColumnType::Date => TableFieldSchema::date(&column.name),
        ColumnType::Time => TableFieldSchema::time(&column.name),
        ColumnType::DateTime => TableFieldSchema::date_time(&column.name),
        ColumnType::Timestamp => TableFieldSchema::timestamp(&column.name),
    };
    field.mode = Some(column.mode.as_str().to_string());

    field
}

/// Extracts the echoed metadata from a table resource.
fn table_metadata(table: &Table) -> TableMetadata {
    TableMetadata {
        table_id: table.table_reference.table_id.clone(),
        description: table.description.clone(),
        partition_field: table
            .time_partitioning
            .as_ref()
            .and_then(|partitioning| partitioning.field.clone()),
    }
}

/// Converts BigQuery errors to provisioning errors with appropriate
/// classification.
///
/// The 404 case is handled by the callers before conversion; by the time an
/// error reaches this function it is never "not found".
fn bq_error_to_provision_error(err: BQError) -> ProvisionError {
    let (kind, description) = match &err {
        // Authentication related errors
        BQError::InvalidServiceAccountKey(_) => (
            ErrorKind::AuthenticationError,
            "Invalid BigQuery service account key",
        ),
        BQError::InvalidServiceAccountAuthenticator(_) => (
            ErrorKind::AuthenticationError,
            "Invalid BigQuery service account authenticator",
        ),
        BQError::InvalidApplicationDefaultCredentialsAuthenticator(_) => (
            ErrorKind::AuthenticationError,
            "Invalid BigQuery application default credentials",
        ),
        BQError::AuthError(_) => (
            ErrorKind::AuthenticationError,
            "BigQuery authentication error",
        ),
        BQError::YupAuthError(_) => (
            ErrorKind::AuthenticationError,
            "BigQuery OAuth authentication error",
        ),
        BQError::NoToken => (
            ErrorKind::AuthenticationError,
            "BigQuery authentication token missing",
        ),

        // Network and transport errors
        BQError::RequestError(_) => (ErrorKind::WarehouseIoError, "BigQuery request failed"),

        // Rejected requests
        BQError::ResponseError { error } if error.error.code == 401 => (
            ErrorKind::AuthenticationError,
            "BigQuery authentication rejected",
        ),
        BQError::ResponseError { error } if error.error.code == 403 => {
            (ErrorKind::PermissionDenied, "BigQuery permission denied")
        }
        BQError::ResponseError { .. } => (
            ErrorKind::WarehouseRequestFailed,
            "BigQuery response error",
        ),

        _ => (ErrorKind::Unknown, "BigQuery operation failed"),
    };

    let detail = err.to_string();
    provision_error!(kind, description, detail = detail, source: err)
}
