use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, ProvisionResult};
use crate::storage::StorageClient;
use crate::types::BucketSpec;

#[derive(Debug)]
struct Inner {
    buckets: HashMap<String, String>,
    create_calls: Vec<BucketSpec>,
    exists_calls: Vec<String>,
    injected_error: Option<ErrorKind>,
}

/// In-memory storage service for testing and development purposes.
///
/// [`MemoryStorage`] keeps bucket state in memory and records every call made
/// against it, so tests can assert not just on the end state but on which
/// operations the provisioner actually issued. All state is lost when the
/// process terminates.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Creates a new empty memory storage service.
    pub fn new() -> Self {
        let inner = Inner {
            buckets: HashMap::new(),
            create_calls: Vec::new(),
            exists_calls: Vec::new(),
            injected_error: None,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Seeds a bucket as pre-existing.
    pub async fn add_bucket(&self, name: impl Into<String>, location: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.buckets.insert(name.into(), location.into());
    }

    /// Returns the names of all buckets currently held.
    pub async fn bucket_names(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.buckets.keys().cloned().collect()
    }

    /// Returns a copy of all bucket creation calls received so far.
    pub async fn create_calls(&self) -> Vec<BucketSpec> {
        let inner = self.inner.lock().await;
        inner.create_calls.clone()
    }

    /// Returns a copy of all existence checks received so far.
    pub async fn exists_calls(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.exists_calls.clone()
    }

    /// Makes the next call fail with an error of the given kind.
    pub async fn inject_error(&self, kind: ErrorKind) {
        let mut inner = self.inner.lock().await;
        inner.injected_error = Some(kind);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageClient for MemoryStorage {
    async fn bucket_exists(&self, name: &str) -> ProvisionResult<bool> {
        let mut inner = self.inner.lock().await;
        inner.exists_calls.push(name.to_owned());

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected storage failure");
        }

        Ok(inner.buckets.contains_key(name))
    }

    async fn create_bucket(&self, spec: &BucketSpec) -> ProvisionResult<()> {
        let mut inner = self.inner.lock().await;
        inner.create_calls.push(spec.clone());

        if let Some(kind) = inner.injected_error.take() {
            bail!(kind, "Injected storage failure");
        }

        info!("creating in-memory bucket {}", spec.name);

        inner
            .buckets
            .insert(spec.name.clone(), spec.location.clone());

        Ok(())
    }
}
