//! Logging initialization.
//!
//! Diagnostics go to stderr so they never mix with diff output on stdout.

use std::io;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "hcsdiff=debug"
    } else {
        "hcsdiff=warn"
    }
}

/// Installs the global subscriber. Later calls do nothing.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
        // Another subscriber may already be installed (e.g. by a test harness).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init();
    });
}
