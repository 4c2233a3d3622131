use std::future::Future;

use crate::error::ProvisionResult;
use crate::types::BucketSpec;

/// Trait for object storage services that can host provisioned buckets.
///
/// Implementations wrap a remote storage API. Operations are idempotent only
/// in combination: the provisioner checks existence before creating, and the
/// remote existence check is what makes repeated invocations safe.
pub trait StorageClient {
    /// Returns whether the bucket exists.
    ///
    /// `Ok(false)` means the service explicitly reported the bucket as not
    /// found. Transport, authentication, and permission failures must
    /// propagate as errors rather than being folded into absence.
    fn bucket_exists(&self, name: &str) -> impl Future<Output = ProvisionResult<bool>> + Send;

    /// Creates the bucket with the placement configured on the descriptor.
    fn create_bucket(&self, spec: &BucketSpec) -> impl Future<Output = ProvisionResult<()>> + Send;
}
