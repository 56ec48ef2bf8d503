//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`. The filter comes from the
//! `SVN2GIT_LOG` environment variable when set; otherwise `--verbose`
//! enables debug output for this crate, which includes every command line
//! that is run.

use tracing_subscriber::EnvFilter;

use crate::constants::{ENV_LOG_FILTER, LOG_FILTER_DEFAULT, LOG_FILTER_VERBOSE};

/// Filter used when `SVN2GIT_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        LOG_FILTER_VERBOSE
    } else {
        LOG_FILTER_DEFAULT
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
