//! The host boundary: where routed events leave the module
//!
//! A host bridge implements [`HostSink`] and attaches it to the router.
//! [`ChannelSink`] is a ready-made sink backed by a std channel, paired with
//! a [`HostEventIterator`] for consuming events synchronously.

use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::Value;

use crate::catalog::EventKind;
use crate::error::{EventError, Result};

/// One event as delivered to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostEvent {
    /// Canonical event name, e.g. `AUDIO_CHANGE`
    pub name: &'static str,

    /// Device scope the event was routed under, if any
    pub scope: Option<String>,

    /// JSON payload
    pub payload: Value,

    /// When the router handed the event to the sink
    pub timestamp: SystemTime,
}

impl HostEvent {
    pub fn new(kind: EventKind, scope: Option<String>, payload: Value) -> Self {
        Self {
            name: kind.name(),
            scope,
            payload,
            timestamp: SystemTime::now(),
        }
    }
}

/// Outbound delivery channel to the host
///
/// Called from whatever thread the originating OS callback fired on, so
/// implementations must tolerate concurrent calls.
pub trait HostSink: Send + Sync {
    fn deliver(&self, event: HostEvent) -> Result<()>;
}

/// Sink that forwards events into a std channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<HostEvent>,
}

impl ChannelSink {
    /// Create a sink together with the iterator that drains it
    pub fn new() -> (Self, HostEventIterator) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, HostEventIterator::new(Arc::new(Mutex::new(rx))))
    }
}

impl HostSink for ChannelSink {
    fn deliver(&self, event: HostEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| EventError::ChannelClosed)
    }
}

/// Receiving end of a [`ChannelSink`]
///
/// Iterating blocks until the sink delivers the next event, and ends once
/// every sink clone is dropped. Clones share one receiver, so each event
/// is observed by exactly one of them.
#[derive(Clone)]
pub struct HostEventIterator {
    rx: Arc<Mutex<mpsc::Receiver<HostEvent>>>,
}

impl HostEventIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<HostEvent>>>) -> Self {
        Self { rx }
    }

    pub fn recv(&self) -> Option<HostEvent> {
        self.rx.lock().ok()?.recv().ok()
    }

    /// The next already-delivered event, if any
    pub fn try_recv(&self) -> Option<HostEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<HostEvent> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Drain what has been delivered so far without waiting for more
    pub fn try_iter(&self) -> impl Iterator<Item = HostEvent> + '_ {
        std::iter::from_fn(move || self.try_recv())
    }
}

impl Iterator for HostEventIterator {
    type Item = HostEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
