//! The closed set of event kinds a host may subscribe to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Every event kind known to the bridge.
///
/// `AudioChange` and `DeviceAction` are emitted by the observers in this
/// workspace. The remaining kinds belong to the device transport; they are
/// valid subscription targets so that a host can register for them through
/// the same listener API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Audio output route changed (device connected or disconnected)
    AudioChange,
    /// Lock-screen transport control was pressed
    DeviceAction,
    /// Bluetooth adapter was switched on
    BluetoothEnabled,
    /// Bluetooth adapter was switched off
    BluetoothDisabled,
    /// A device session was opened
    DeviceConnected,
    /// A device session was closed
    DeviceDisconnected,
    /// A device was found during discovery
    DeviceDiscovered,
    /// Data was read from a connected device
    DeviceRead,
    /// Transport level error
    Error,
}

impl EventKind {
    /// All kinds, in the order reported to the host as supported events
    pub const ALL: [EventKind; 9] = [
        EventKind::BluetoothEnabled,
        EventKind::BluetoothDisabled,
        EventKind::DeviceConnected,
        EventKind::DeviceDisconnected,
        EventKind::DeviceDiscovered,
        EventKind::DeviceRead,
        EventKind::Error,
        EventKind::AudioChange,
        EventKind::DeviceAction,
    ];

    /// Canonical wire name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::AudioChange => "AUDIO_CHANGE",
            EventKind::DeviceAction => "DEVICE_ACTION",
            EventKind::BluetoothEnabled => "BLUETOOTH_ENABLED",
            EventKind::BluetoothDisabled => "BLUETOOTH_DISABLED",
            EventKind::DeviceConnected => "DEVICE_CONNECTED",
            EventKind::DeviceDisconnected => "DEVICE_DISCONNECTED",
            EventKind::DeviceDiscovered => "DEVICE_DISCOVERED",
            EventKind::DeviceRead => "DEVICE_READ",
            EventKind::Error => "ERROR",
        }
    }

    /// Look up a kind by its canonical name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EventError::UnknownEvent(s.to_string()))
    }
}

/// Whether `name` is the canonical name of a known event kind
pub fn is_valid(name: &str) -> bool {
    EventKind::from_name(name).is_some()
}

/// Canonical names of every supported event, in reporting order
pub fn supported_events() -> Vec<&'static str> {
    EventKind::ALL.iter().map(EventKind::name).collect()
}
