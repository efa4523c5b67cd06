//! Diagnostic logging
//!
//! `tracing` carries debug detail and recoverable warnings to stderr. User
//! facing status lines go through [`crate::ui`] instead.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "AGNTX_LOG";

/// Initialize the tracing subscriber.
///
/// `AGNTX_LOG` takes any `EnvFilter` directive and wins over `--verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init in the same process (tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
