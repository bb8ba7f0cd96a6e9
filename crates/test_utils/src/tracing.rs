//! Log output for tests
//!
//! Tests call [`init_test_tracing`] to see the `tracing` events emitted by
//! the code under test. The filter is read from `RUST_LOG` and defaults to
//! `warn`.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING: OnceCell<()> = OnceCell::new();

/// Installs a test-friendly subscriber once per process
///
/// Safe to call from every test; only the first call does anything.
pub fn init_test_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already have installed a global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
