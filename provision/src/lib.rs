//! Idempotent provisioning helpers for cloud storage and warehouse resources.
//!
//! This crate wraps the Google Cloud Storage and BigQuery APIs with
//! create-if-absent semantics: buckets, datasets, and partitioned tables are
//! checked for existence and created only when missing, so setup routines can
//! be re-run safely. The [`Provisioner`] is generic over the
//! [`storage::StorageClient`] and [`warehouse::WarehouseClient`] traits, with
//! in-memory implementations available for tests.

pub mod config;
pub mod error;
pub mod provisioner;
pub mod storage;
pub mod types;
pub mod warehouse;

mod macros;

pub use error::{ErrorKind, ProvisionError, ProvisionResult};
pub use provisioner::Provisioner;
