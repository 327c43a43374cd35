//! Tracing subscriber setup for the binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Variable holding the log filter, e.g. `LIBRO_LOG=libro=debug`
pub const LOG_ENV: &str = "LIBRO_LOG";

const DEFAULT_FILTER: &str = "libro=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once; logs go to stderr so that command
/// output on stdout stays clean
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber may already be set by an embedding application
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
