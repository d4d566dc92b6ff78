//! # Bridge Observers
//!
//! Components that translate OS-originated state into router emissions, plus
//! the synchronous queries that bypass the router.
//!
//! - [`AudioRouteObserver`]: route-change notifications → `AUDIO_CHANGE`
//! - [`RemoteCommandBridge`]: lock-screen transport controls → `DEVICE_ACTION`,
//!   and lyric text → now-playing title
//! - [`AdapterStateMonitor`]: pull query of the adapter power state
//!
//! Every OS surface sits behind a trait ([`AudioSession`],
//! [`RemoteCommandCenter`], [`NowPlayingCenter`], [`RadioManager`]) so the
//! platform glue can be supplied by the host. In-memory implementations live
//! in [`simulated`] behind the `test-support` feature.

pub mod adapter;
pub mod audio_route;
pub mod error;
pub mod observer;
pub mod remote_command;

#[cfg(any(test, feature = "test-support"))]
pub mod simulated;

pub use adapter::{AdapterPowerState, AdapterStateMonitor, RadioManager};
pub use audio_route::{
    AudioRouteEndpoint, AudioRouteObserver, AudioSession, ListenerToken, RouteChangeCallback,
    RouteChangeClass, RouteChangeNotification, RouteChangeReason,
};
pub use error::{ObserverError, Result};
pub use observer::Observer;
pub use remote_command::{
    CommandHandler, CommandStatus, DeviceActionPayload, NowPlayingCenter, RemoteCommandAction,
    RemoteCommandBridge, RemoteCommandCenter,
};
