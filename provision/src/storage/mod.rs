//! Object storage abstractions for bucket provisioning.
//!
//! This module provides the core [`StorageClient`] trait, the Google Cloud
//! Storage implementation, and an in-memory implementation for tests and
//! development.

mod base;
pub mod gcs;
pub mod memory;

pub use base::StorageClient;
