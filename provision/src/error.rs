//! Error types and result definitions for provisioning operations.
//!
//! Provides an error system with kind classification and captured diagnostic
//! metadata. "Not found" is deliberately absent from the taxonomy: existence
//! checks convert the not-found case into `Ok(false)` so callers can never
//! conflate a missing resource with a transport or authentication failure.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for provisioning operations using [`ProvisionError`]
/// as the error type.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Detailed payload stored for [`ProvisionError`] instances.
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Main error type for provisioning operations.
///
/// Carries a classification [`ErrorKind`], a static description, optional
/// dynamic detail, an optional source error, and the callsite location.
#[derive(Debug, Clone)]
pub struct ProvisionError {
    payload: ErrorPayload,
}

/// Specific categories of errors that can occur while provisioning.
///
/// The taxonomy separates the two remote services and, within each, transport
/// failures from rejected requests, so callers can decide what is worth
/// surfacing versus aborting on.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Credential & permission errors
    AuthenticationError,
    PermissionDenied,

    // Cloud Storage errors
    StorageIoError,
    StorageRequestFailed,

    // Warehouse errors
    WarehouseIoError,
    WarehouseRequestFailed,

    // Contract violations
    PostconditionViolation,

    // Configuration errors
    ConfigError,

    // Unknown / uncategorized
    Unknown,
}

impl ProvisionError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance. The stored source is preserved across clones and
    /// exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`ProvisionError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        ProvisionError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
            },
        }
    }
}

impl PartialEq for ProvisionError {
    /// Two errors compare equal when their kinds match; the description,
    /// detail, and location are diagnostic only.
    fn eq(&self, other: &ProvisionError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let location = self.payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.payload.kind,
            self.payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        if let Some(detail) = self.payload.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for ProvisionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`ProvisionError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for ProvisionError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> ProvisionError {
        ProvisionError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`ProvisionError`] from an error kind, static description, and
/// dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for ProvisionError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> ProvisionError {
        ProvisionError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_compare_by_kind_only() {
        let a = ProvisionError::from((ErrorKind::ConfigError, "first"));
        let b = ProvisionError::from((ErrorKind::ConfigError, "second", "with detail"));
        let c = ProvisionError::from((ErrorKind::Unknown, "first"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_includes_kind_description_and_detail() {
        let err = ProvisionError::from((
            ErrorKind::PostconditionViolation,
            "Echo mismatch",
            "requested `orders`, got `orders_v2`",
        ));

        let rendered = err.to_string();
        assert!(rendered.contains("PostconditionViolation"));
        assert!(rendered.contains("Echo mismatch"));
        assert!(rendered.contains("orders_v2"));
    }
}
