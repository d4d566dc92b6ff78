//! Module configuration
//!
//! Hosts may pass the configuration as JSON; every field has a default so a
//! partial (or empty) object is accepted.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::LoggingMode;

/// Name the module registers under with the host bridge
pub const DEFAULT_MODULE_NAME: &str = "RNBluetoothClassic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Name reported to the host
    /// Default: "RNBluetoothClassic"
    pub module_name: String,

    /// Register lock-screen handlers in `start()` rather than on the first
    /// `sendLyrics`
    /// Default: false
    pub register_remote_commands_eagerly: bool,

    /// Emit a debug log line for every emission skipped for lack of listeners
    /// Default: true
    pub log_skipped_emissions: bool,

    /// Logging installed by `start()` when no subscriber is set yet
    /// Default: Silent
    pub logging: LoggingMode,

    /// `EnvFilter` directive for that logging, e.g. `"bridge_events=debug"`;
    /// when unset the environment decides, then the mode's level
    /// Default: None
    pub log_filter: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            register_remote_commands_eagerly: false,
            log_skipped_emissions: true,
            logging: LoggingMode::Silent,
            log_filter: None,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration supplied by the host
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_eager_remote_commands(mut self, eager: bool) -> Self {
        self.register_remote_commands_eagerly = eager;
        self
    }

    pub fn with_skip_logging(mut self, enabled: bool) -> Self {
        self.log_skipped_emissions = enabled;
        self
    }

    pub fn with_logging(mut self, mode: LoggingMode) -> Self {
        self.logging = mode;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}
