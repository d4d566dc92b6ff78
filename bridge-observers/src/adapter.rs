//! Bluetooth adapter power state
//!
//! A pull query, not an observer: the state is read from the radio manager
//! every time it is asked for.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Power states reported by the radio manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdapterPowerState {
    #[default]
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

/// The OS radio/adapter manager
///
/// Constructing the manager may trigger a first-time permission prompt;
/// that happens when the host builds it, not on the first query.
pub trait RadioManager: Send + Sync {
    fn power_state(&self) -> AdapterPowerState;
}

pub struct AdapterStateMonitor {
    manager: Arc<dyn RadioManager>,
}

impl AdapterStateMonitor {
    pub fn new(manager: Arc<dyn RadioManager>) -> Self {
        tracing::debug!("Adapter state monitor initialized");
        Self { manager }
    }

    pub fn power_state(&self) -> AdapterPowerState {
        self.manager.power_state()
    }

    /// `true` only when the adapter reports powered on
    pub fn is_enabled(&self) -> bool {
        let state = self.power_state();
        tracing::trace!("Adapter power state: {:?}", state);
        state == AdapterPowerState::PoweredOn
    }
}

impl std::fmt::Debug for AdapterStateMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterStateMonitor").finish_non_exhaustive()
    }
}
