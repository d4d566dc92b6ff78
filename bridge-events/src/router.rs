//! Subscription-gated event routing
//!
//! [`EventRouter::emit`] is the single send path out of the module. An event
//! reaches the host only when at least one listener is registered for its
//! qualified key, and only while a host sink is attached. Delivery is fire
//! and forget: no retry, no buffering.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::catalog::EventKind;
use crate::error::EventError;
use crate::key::QualifiedEventKey;
use crate::registry::ListenerRegistry;
use crate::sink::{HostEvent, HostSink};

/// What happened to a single emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nobody is listening on the key
    Skipped,
    /// Handed to the host sink
    Delivered,
    /// Listeners exist but the event could not be delivered
    Dropped,
}

pub struct EventRouter {
    registry: Arc<ListenerRegistry>,
    sink: RwLock<Option<Arc<dyn HostSink>>>,
    log_skipped: bool,
}

impl EventRouter {
    /// Create a router over `registry` with no host attached yet
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self {
            registry,
            sink: RwLock::new(None),
            log_skipped: true,
        }
    }

    /// Enable or disable the debug log line for gated emissions
    pub fn with_skip_logging(mut self, enabled: bool) -> Self {
        self.log_skipped = enabled;
        self
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Attach the host boundary, replacing any previous sink
    pub fn attach(&self, sink: Arc<dyn HostSink>) {
        *self.sink.write() = Some(sink);
        tracing::debug!("Host boundary attached");
    }

    /// Detach the host boundary; later emissions are dropped
    pub fn detach(&self) {
        if self.sink.write().take().is_some() {
            tracing::debug!("Host boundary detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Forward an event to the host if anyone is listening
    ///
    /// The payload is serialized only after the subscription check passes.
    pub fn emit<P>(&self, kind: EventKind, scope: Option<&str>, payload: &P) -> Delivery
    where
        P: Serialize + ?Sized,
    {
        let key = QualifiedEventKey::with_scope(kind, scope);

        if !self.registry.is_subscribed(&key) {
            if self.log_skipped {
                tracing::debug!("No listeners for {}, skipping emission", key);
            }
            return Delivery::Skipped;
        }

        // Clone the handle so delivery runs without holding the lock
        let sink = match self.sink.read().clone() {
            Some(sink) => sink,
            None => {
                let err = EventError::BoundaryDetached {
                    event: key.to_string(),
                };
                tracing::error!("{}", err);
                return Delivery::Dropped;
            }
        };

        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(source) => {
                let err = EventError::Payload {
                    event: key.to_string(),
                    source,
                };
                tracing::error!("{}", err);
                return Delivery::Dropped;
            }
        };

        match sink.deliver(HostEvent::new(kind, key.scope, payload)) {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::error!("Failed to deliver {} event: {}", kind, e);
                Delivery::Dropped
            }
        }
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("registry", &self.registry)
            .field("attached", &self.is_attached())
            .field("log_skipped", &self.log_skipped)
            .finish()
    }
}
