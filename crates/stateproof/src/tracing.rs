//! Logging setup for binaries that embed the proof engine.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with the default `info` filter.
///
/// `RUST_LOG` overrides the filter; `RUST_LOG=stateproof_core=debug` shows
/// merge decisions and verification failures.
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Log line prefixes for proof operations.
pub mod prefix {
    /// Aggregation
    pub const AGGREGATE: &str = "⋈";
    /// Verification
    pub const VERIFY: &str = "✓";
    /// Wire encoding and decoding
    pub const CODEC: &str = "⇄";
}
