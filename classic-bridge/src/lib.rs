//! # Classic Bridge
//!
//! Host-facing module that bridges OS hardware and media-session events into a
//! subscription-gated event stream.
//!
//! ## Commands
//!
//! | Command | Behavior |
//! |---|---|
//! | `isBluetoothEnabled` | adapter powered on? never fails |
//! | `getCurrentRoute` | current audio outputs as `{uid, portName}` |
//! | `sendLyrics` | writes the now-playing title; first call registers lock-screen handlers |
//! | `addListener` | `+1` on `<EventType>[@<scope>]` |
//! | `removeListener` | `-1`, floored at zero |
//! | `removeAllListeners` | `-1`, floored at zero |
//!
//! ## Events
//!
//! - `AUDIO_CHANGE`: `{uid, portName}` per output when a device connects, `{}` when one
//!   disconnects
//! - `DEVICE_ACTION`: `{action}` for lock-screen play/pause/next/prev
//!
//! ## Architecture
//!
//! ```text
//! classic-bridge (module façade, request dispatch, config, logging)
//!     ↓
//! bridge-observers (audio route, remote commands, adapter state)
//!     ↓
//! bridge-events (catalog, qualified keys, listener registry, router)
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod module;

pub use config::BridgeConfig;
pub use dispatch::{CommandResponse, HostRequest, ModuleCommand};
pub use error::{BridgeError, Result};
pub use logging::LoggingMode;
pub use module::{BluetoothClassicModule, Platform};

// Re-export commonly used types from the lower layers
pub use bridge_events::{ChannelSink, EventKind, HostEvent, HostEventIterator, HostSink};
pub use bridge_observers::{AdapterPowerState, AudioRouteEndpoint, RemoteCommandAction};

#[cfg(feature = "test-support")]
pub use bridge_observers::simulated;
