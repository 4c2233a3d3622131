use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::Error as GcsError;
use google_cloud_storage::http::buckets::get::GetBucketRequest;
use google_cloud_storage::http::buckets::insert::{
    BucketCreationConfig, InsertBucketParam, InsertBucketRequest,
};
use std::fmt;
use tracing::info;

use crate::config::StorageConfig;
use crate::error::{ErrorKind, ProvisionError, ProvisionResult};
use crate::provision_error;
use crate::storage::StorageClient;
use crate::types::BucketSpec;

/// A client for managing Google Cloud Storage buckets.
pub struct GcsStorage {
    project_id: String,
    client: Client,
}

impl GcsStorage {
    /// Creates a new [`GcsStorage`] using application default credentials.
    ///
    /// Honors the endpoint override in the configuration, which is primarily
    /// useful for testing against emulators.
    pub async fn new(config: StorageConfig) -> ProvisionResult<Self> {
        config.validate().map_err(|err| {
            provision_error!(
                ErrorKind::ConfigError,
                "Invalid storage configuration",
                err.to_string()
            )
        })?;

        let mut client_config = ClientConfig::default().with_auth().await.map_err(|err| {
            provision_error!(
                ErrorKind::AuthenticationError,
                "Cloud Storage authentication failed",
                err.to_string(),
                source: err
            )
        })?;
        if let Some(endpoint) = &config.endpoint {
            client_config.storage_endpoint = endpoint.clone();
        }

        Ok(Self::new_with_config(config.project_id, client_config))
    }

    /// Creates a new [`GcsStorage`] from an explicit client configuration.
    ///
    /// Useful for anonymous access against emulators where no token source is
    /// available.
    pub fn new_with_config(project_id: String, client_config: ClientConfig) -> Self {
        Self {
            project_id,
            client: Client::new(client_config),
        }
    }
}

impl StorageClient for GcsStorage {
    async fn bucket_exists(&self, name: &str) -> ProvisionResult<bool> {
        let result = self
            .client
            .get_bucket(&GetBucketRequest {
                bucket: name.to_owned(),
                ..Default::default()
            })
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(GcsError::Response(response)) if response.code == 404 => Ok(false),
            Err(err) => Err(gcs_error_to_provision_error(err)),
        }
    }

    async fn create_bucket(&self, spec: &BucketSpec) -> ProvisionResult<()> {
        info!(
            bucket = %spec.name,
            location = %spec.location,
            "creating bucket in cloud storage"
        );

        self.client
            .insert_bucket(&InsertBucketRequest {
                name: spec.name.clone(),
                param: InsertBucketParam {
                    project: self.project_id.clone(),
                    ..Default::default()
                },
                bucket: BucketCreationConfig {
                    location: spec.location.clone(),
                    ..Default::default()
                },
            })
            .await
            .map_err(gcs_error_to_provision_error)?;

        Ok(())
    }
}

impl fmt::Debug for GcsStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsStorage")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Converts Cloud Storage errors to provisioning errors with appropriate
/// classification.
///
/// The 404 case is handled by the callers before conversion; by the time an
/// error reaches this function it is never "not found".
fn gcs_error_to_provision_error(err: GcsError) -> ProvisionError {
    let (kind, description) = match &err {
        GcsError::Response(response) => match response.code {
            401 => (
                ErrorKind::AuthenticationError,
                "Cloud Storage authentication failed",
            ),
            403 => (
                ErrorKind::PermissionDenied,
                "Cloud Storage permission denied",
            ),
            _ => (
                ErrorKind::StorageRequestFailed,
                "Cloud Storage request rejected",
            ),
        },
        GcsError::TokenSource(_) => (
            ErrorKind::AuthenticationError,
            "Cloud Storage token source failed",
        ),
        _ => (ErrorKind::StorageIoError, "Cloud Storage transport error"),
    };

    let detail = err.to_string();
    provision_error!(kind, description, detail = detail, source: err)
}
