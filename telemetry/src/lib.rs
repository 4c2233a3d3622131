//! Tracing initialization shared by composition roots and tests.
//!
//! Provisioning code emits structured logs through [`tracing`] and never
//! installs a subscriber itself; the process owning the lifecycle calls one
//! of the initializers below exactly once.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for production use.
///
/// The filter is taken from `RUST_LOG` and defaults to `info` when the
/// variable is unset or invalid.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    });
}

/// Initializes tracing for tests.
///
/// Output goes through the test writer so logs are captured per test and
/// only shown for failures. Safe to call from every test.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .init();
    });
}
