// tests/common.rs
//! Log capture for integration tests
//!
//! With the `logging` feature, provisioning and rotation events show up in
//! failing test output. `RUST_LOG` wins; otherwise this crate logs at debug.

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(feature = "logging")]
const DEFAULT_TEST_FILTER: &str = "envelope_key_vault=debug";

#[allow(dead_code)]
pub fn setup() {
    #[cfg(feature = "logging")]
    {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
        // Only the first test in a binary installs the subscriber
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(false))
            .with(filter)
            .try_init();
    }
}
