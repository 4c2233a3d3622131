//! Resource descriptors for provisioned cloud resources.
//!
//! A descriptor captures everything the provisioner needs to know about a
//! resource: its name, placement, and (for tables) schema and partitioning.
//! Descriptors are plain data; no naming rules are validated locally, the
//! remote service is the authority on what constitutes a valid name.

/// Default regional placement for storage buckets.
pub const DEFAULT_BUCKET_LOCATION: &str = "US-CENTRAL1";

/// Default multi-regional placement for warehouse datasets.
pub const DEFAULT_DATASET_LOCATION: &str = "US";

/// Descriptor of a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    /// Bucket name, globally unique within the storage service.
    pub name: String,
    /// Regional placement, applied only at creation time.
    pub location: String,
}

impl BucketSpec {
    /// Creates a bucket descriptor with the default location.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: DEFAULT_BUCKET_LOCATION.to_string(),
        }
    }

    /// Overrides the regional placement.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Descriptor of a warehouse dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Dataset name, unique within the project.
    pub name: String,
    /// Geographic placement, applied only at creation time.
    pub location: String,
}

impl DatasetSpec {
    /// Creates a dataset descriptor with the default location.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: DEFAULT_DATASET_LOCATION.to_string(),
        }
    }

    /// Overrides the geographic placement.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Granularity of time-based table partitioning.
///
/// Day is currently the only supported granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionGranularity {
    #[default]
    Day,
}

impl PartitionGranularity {
    /// Returns the wire representation used by the warehouse API.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionGranularity::Day => "DAY",
        }
    }
}

/// Scalar column types supported by the warehouse schema pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    Numeric,
    String,
    Bytes,
    Date,
    Time,
    DateTime,
    Timestamp,
}

/// Mode of a warehouse column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMode {
    #[default]
    Nullable,
    Required,
    Repeated,
}

impl ColumnMode {
    /// Returns the wire representation used by the warehouse API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnMode::Nullable => "NULLABLE",
            ColumnMode::Required => "REQUIRED",
            ColumnMode::Repeated => "REPEATED",
        }
    }
}

/// Schema of a single warehouse column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub typ: ColumnType,
    pub mode: ColumnMode,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, typ: ColumnType, mode: ColumnMode) -> Self {
        Self {
            name: name.into(),
            typ,
            mode,
        }
    }
}

/// Descriptor of a partitioned warehouse table.
///
/// The column order is preserved as given; the description is applied through
/// a separate update call after creation, not as part of the create itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Dataset the table lives in; ensured before the table itself.
    pub dataset: DatasetSpec,
    /// Table name, unique within the dataset.
    pub name: String,
    /// Human-readable description, applied after creation.
    pub description: String,
    /// Ordered column schemas, passed through to the service unmodified.
    pub columns: Vec<ColumnSchema>,
    /// Column the table is time-partitioned on.
    pub partition_column: String,
    /// Partition granularity.
    pub partition_granularity: PartitionGranularity,
}

impl TableSpec {
    /// Creates a table descriptor partitioned daily on `partition_column`.
    pub fn new(
        dataset: DatasetSpec,
        name: impl Into<String>,
        description: impl Into<String>,
        columns: Vec<ColumnSchema>,
        partition_column: impl Into<String>,
    ) -> Self {
        Self {
            dataset,
            name: name.into(),
            description: description.into(),
            columns,
            partition_column: partition_column.into(),
            partition_granularity: PartitionGranularity::Day,
        }
    }
}

/// Metadata echoed back by the warehouse for a table resource.
///
/// Used by the provisioner to verify that the service persisted what was
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    /// Identifier the service assigned to the table.
    pub table_id: String,
    /// Description stored on the table, if any.
    pub description: Option<String>,
    /// Column the table is partitioned on, if partitioned.
    pub partition_field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_spec_defaults_to_us_central1() {
        let spec = BucketSpec::new("raw-landing-zone");
        assert_eq!(spec.location, DEFAULT_BUCKET_LOCATION);

        let spec = spec.with_location("EUROPE-WEST1");
        assert_eq!(spec.location, "EUROPE-WEST1");
    }

    #[test]
    fn dataset_spec_defaults_to_us() {
        let spec = DatasetSpec::new("analytics");
        assert_eq!(spec.location, DEFAULT_DATASET_LOCATION);
    }

    #[test]
    fn table_spec_is_partitioned_daily() {
        let spec = TableSpec::new(
            DatasetSpec::new("analytics"),
            "orders",
            "Order snapshots",
            vec![ColumnSchema::new(
                "ordered_at",
                ColumnType::Timestamp,
                ColumnMode::Required,
            )],
            "ordered_at",
        );

        assert_eq!(spec.partition_granularity, PartitionGranularity::Day);
        assert_eq!(spec.partition_granularity.as_str(), "DAY");
    }
}
