//! Stderr logging for hosts that don't install their own subscriber
//!
//! Hosts embedding the module usually own stdout/stderr, so the default
//! mode installs nothing.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    #[default]
    Silent,
    /// Compact lines at `info`
    Development,
    /// `debug` with targets, thread ids and source locations
    Debug,
}

impl LoggingMode {
    fn default_level(self) -> Option<&'static str> {
        match self {
            LoggingMode::Silent => None,
            LoggingMode::Development => Some("info"),
            LoggingMode::Debug => Some("debug"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Install the stderr subscriber for `mode`
///
/// The filter is the first one set of: `filter` (from `BridgeConfig`),
/// `CLASSIC_BRIDGE_LOG_LEVEL`, `RUST_LOG`, then the mode's level.
pub fn init_logging(mode: LoggingMode, filter: Option<&str>) -> Result<(), LoggingError> {
    let Some(level) = mode.default_level() else {
        return Ok(());
    };

    let verbose = mode == LoggingMode::Debug;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    Registry::default()
        .with(EnvFilter::new(filter_directive(filter, level)))
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}

fn filter_directive(configured: Option<&str>, default_level: &str) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("CLASSIC_BRIDGE_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| default_level.to_string())
}

/// Whether any global subscriber is installed, ours or the host's
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
