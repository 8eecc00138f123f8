//! Logging setup helpers.
//!
//! Validation findings are reported as structured events, not log lines; the
//! default notification policy in [`crate::validate::notify`] writes warnings
//! through `tracing`. These helpers configure a subscriber for binaries and
//! tests that want to see that output.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a global subscriber honoring `RUST_LOG`, defaulting to `info`
/// for this crate. Returns an error if a subscriber is already installed.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("decl_guard=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}

/// Initializes logging, ignoring the error when a subscriber already exists.
/// Intended for tests, where multiple suites may race to install one.
pub fn init_for_tests() {
    let _ = try_init();
}
