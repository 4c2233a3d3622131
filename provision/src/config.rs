//! Client configuration for the managed service backends.
//!
//! Configuration covers client construction only: project, credentials, and
//! endpoint overrides for emulators. Resource placement lives on the resource
//! descriptors themselves (see [`crate::types`]).

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that occur when validating configuration values.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}

/// Configuration for the Cloud Storage client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Google Cloud project identifier owning the buckets.
    pub project_id: String,
    /// Storage endpoint override, primarily useful for emulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl StorageConfig {
    /// Creates a configuration for the given project with no overrides.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            endpoint: None,
        }
    }

    /// Validates storage configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "storage.project_id".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration for the warehouse client.
///
/// This intentionally does not implement [`Serialize`] to avoid accidentally
/// leaking secrets in the config into serialized forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WarehouseConfig {
    /// Google Cloud project identifier owning the datasets.
    pub project_id: String,
    /// Service account key for authenticating with the warehouse.
    ///
    /// When unset, application default credentials are used.
    #[serde(default)]
    pub service_account_key: Option<SecretString>,
    /// Authentication endpoint override, primarily useful for emulators and
    /// mock servers. Requires `service_account_key` to be set.
    #[serde(default)]
    pub auth_base_url: Option<String>,
    /// Warehouse API endpoint override, paired with `auth_base_url`.
    #[serde(default)]
    pub v2_base_url: Option<String>,
}

impl WarehouseConfig {
    /// Creates a configuration for the given project using application
    /// default credentials.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            service_account_key: None,
            auth_base_url: None,
            v2_base_url: None,
        }
    }

    /// Validates warehouse configuration settings.
    ///
    /// Ensures the project id is set and that endpoint overrides are either
    /// both present or both absent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "warehouse.project_id".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.auth_base_url.is_some() != self.v2_base_url.is_some() {
            return Err(ValidationError::InvalidFieldValue {
                field: "warehouse.auth_base_url".to_string(),
                constraint: "must be set together with `v2_base_url`".to_string(),
            });
        }

        if self.auth_base_url.is_some() && self.service_account_key.is_none() {
            return Err(ValidationError::InvalidFieldValue {
                field: "warehouse.service_account_key".to_string(),
                constraint: "required when endpoint overrides are set".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_project_id_is_rejected() {
        let config = StorageConfig::new("");
        assert!(config.validate().is_err());

        let config = WarehouseConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_overrides_must_be_paired() {
        let mut config = WarehouseConfig::new("local-project");
        config.auth_base_url = Some("http://localhost:9050".to_string());
        assert!(config.validate().is_err());

        config.v2_base_url = Some("http://localhost:9050".to_string());
        // Overrides without a key still fail: there is nothing to authenticate with.
        assert!(config.validate().is_err());

        config.service_account_key = Some("{}".to_string().into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn warehouse_config_deserializes_with_defaults() {
        let config: WarehouseConfig =
            serde_json::from_str(r#"{"project_id": "local-project"}"#).unwrap();

        assert_eq!(config.project_id, "local-project");
        assert!(config.service_account_key.is_none());
        assert!(config.validate().is_ok());
    }
}
