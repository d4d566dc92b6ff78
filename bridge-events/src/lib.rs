//! # Bridge Events
//!
//! Listener-refcounted routing of OS-originated events to a host application.
//!
//! ## Overview
//!
//! Hosts subscribe to named channels (`AUDIO_CHANGE`, `DEVICE_ACTION@<device>`,
//! ...). Observers push events into the [`EventRouter`], which forwards them to
//! the attached [`HostSink`] only when at least one listener is registered for
//! the event's qualified key.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bridge_events::{ChannelSink, EventKind, EventRouter, ListenerRegistry};
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! let router = EventRouter::new(Arc::clone(&registry));
//!
//! let (sink, events) = ChannelSink::new();
//! router.attach(Arc::new(sink));
//!
//! // Nobody listening yet, nothing is delivered
//! router.emit(EventKind::AudioChange, None, &serde_json::json!({}));
//! assert!(events.try_recv().is_none());
//!
//! registry.add_listener("AUDIO_CHANGE").unwrap();
//! router.emit(EventKind::AudioChange, None, &serde_json::json!({}));
//! assert_eq!(events.try_recv().unwrap().name, "AUDIO_CHANGE");
//! ```
//!
//! ## Architecture
//!
//! 1. **Catalog**: the closed set of event kinds and their canonical names
//! 2. **Qualified keys**: `<kind>@<scope>` parsed once at the boundary
//! 3. **Reference counting**: per-key listener counts, floored at zero
//! 4. **Gated routing**: emissions are dropped early when nobody listens

pub mod catalog;
pub mod error;
pub mod key;
pub mod registry;
pub mod router;
pub mod sink;

pub use catalog::{is_valid, supported_events, EventKind};
pub use error::{EventError, Result};
pub use key::QualifiedEventKey;
pub use registry::ListenerRegistry;
pub use router::{Delivery, EventRouter};
pub use sink::{ChannelSink, HostEvent, HostEventIterator, HostSink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ChannelSink, Delivery, EventError, EventKind, EventRouter, HostEvent, HostSink,
        ListenerRegistry, QualifiedEventKey, Result,
    };
}
