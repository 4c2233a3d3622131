//! Warehouse abstractions for dataset and table provisioning.
//!
//! This module provides the core [`WarehouseClient`] trait, the BigQuery
//! implementation, and an in-memory implementation for tests and development.

mod base;
pub mod bigquery;
pub mod memory;

pub use base::WarehouseClient;
