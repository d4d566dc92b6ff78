//! Audio output route observation
//!
//! Listens to the OS audio session's route-change notifications and turns
//! device arrivals and departures into `AUDIO_CHANGE` events.

use std::fmt;
use std::sync::{Arc, Weak};

use bridge_events::{EventKind, EventRouter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::observer::Observer;

/// One output in the current audio route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRouteEndpoint {
    pub uid: String,
    pub port_name: String,
}

impl AudioRouteEndpoint {
    pub fn new(uid: impl Into<String>, port_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            port_name: port_name.into(),
        }
    }
}

/// Reason codes carried by the OS route-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteChangeReason {
    Unknown,
    NewDeviceAvailable,
    OldDeviceUnavailable,
    CategoryChange,
    Override,
    WakeFromSleep,
    NoSuitableRouteForCategory,
    RouteConfigurationChange,
}

impl RouteChangeReason {
    /// Map a raw reason code; codes the OS does not define yield `None`
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::NewDeviceAvailable),
            2 => Some(Self::OldDeviceUnavailable),
            3 => Some(Self::CategoryChange),
            4 => Some(Self::Override),
            6 => Some(Self::WakeFromSleep),
            7 => Some(Self::NoSuitableRouteForCategory),
            8 => Some(Self::RouteConfigurationChange),
            _ => None,
        }
    }

    pub fn classify(self) -> RouteChangeClass {
        match self {
            Self::NewDeviceAvailable => RouteChangeClass::NewDeviceAvailable,
            Self::OldDeviceUnavailable => RouteChangeClass::OldDeviceUnavailable,
            Self::CategoryChange => RouteChangeClass::CategoryChange,
            _ => RouteChangeClass::Other,
        }
    }
}

/// The distinctions the observer acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChangeClass {
    NewDeviceAvailable,
    OldDeviceUnavailable,
    CategoryChange,
    Other,
}

/// Payload of a route-change notification as posted by the OS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteChangeNotification {
    /// Raw reason code, absent when the OS omitted it
    pub reason: Option<u64>,
}

impl RouteChangeNotification {
    pub fn with_reason(code: u64) -> Self {
        Self { reason: Some(code) }
    }

    pub fn reason(&self) -> Option<RouteChangeReason> {
        self.reason.and_then(RouteChangeReason::from_code)
    }
}

/// Handle returned by the OS when a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

impl ListenerToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

}

impl fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

pub type RouteChangeCallback = Arc<dyn Fn(&RouteChangeNotification) + Send + Sync>;

/// The OS audio session
pub trait AudioSession: Send + Sync {
    /// Outputs of the current route, read directly from the session
    fn current_outputs(&self) -> Vec<AudioRouteEndpoint>;

    fn add_route_change_listener(&self, callback: RouteChangeCallback) -> Result<ListenerToken>;

    fn remove_route_change_listener(&self, token: ListenerToken);
}

/// Translates route-change notifications into `AUDIO_CHANGE` emissions
pub struct AudioRouteObserver {
    session: Arc<dyn AudioSession>,
    router: Arc<EventRouter>,
    token: Mutex<Option<ListenerToken>>,
}

impl AudioRouteObserver {
    pub fn new(session: Arc<dyn AudioSession>, router: Arc<EventRouter>) -> Self {
        Self {
            session,
            router,
            token: Mutex::new(None),
        }
    }

    /// Outputs of the current route, regardless of listener state
    pub fn current_route(&self) -> Vec<AudioRouteEndpoint> {
        self.session.current_outputs()
    }

    /// Process one notification; returns the number of emissions attempted
    pub fn handle_route_change(&self, notification: &RouteChangeNotification) -> usize {
        handle_notification(self.session.as_ref(), &self.router, notification)
    }
}

fn handle_notification(
    session: &dyn AudioSession,
    router: &EventRouter,
    notification: &RouteChangeNotification,
) -> usize {
    let reason = match (notification.reason, notification.reason()) {
        (_, Some(reason)) => reason,
        (Some(code), None) => {
            tracing::warn!("Unrecognized route change reason {}, ignoring", code);
            return 0;
        }
        (None, None) => return 0,
    };

    match reason.classify() {
        RouteChangeClass::NewDeviceAvailable => {
            let outputs = session.current_outputs();
            tracing::debug!("New audio device available, {} outputs", outputs.len());
            for endpoint in &outputs {
                router.emit(EventKind::AudioChange, None, endpoint);
            }
            outputs.len()
        }
        RouteChangeClass::OldDeviceUnavailable => {
            tracing::debug!("Audio device unavailable");
            router.emit(EventKind::AudioChange, None, &serde_json::Map::new());
            1
        }
        RouteChangeClass::CategoryChange => {
            tracing::debug!("Audio session category changed");
            0
        }
        RouteChangeClass::Other => {
            tracing::trace!("Route change ignored: {:?}", reason);
            0
        }
    }
}

impl Observer for AudioRouteObserver {
    fn name(&self) -> &'static str {
        "audio-route"
    }

    fn start(&self) -> Result<()> {
        let mut token = self.token.lock();
        if token.is_some() {
            tracing::debug!("Audio route observer already started");
            return Ok(());
        }

        let session: Weak<dyn AudioSession> = Arc::downgrade(&self.session);
        let router = Arc::clone(&self.router);
        let callback: RouteChangeCallback = Arc::new(move |notification: &RouteChangeNotification| {
            if let Some(session) = session.upgrade() {
                handle_notification(session.as_ref(), &router, notification);
            }
        });

        let registered = self.session.add_route_change_listener(callback)?;
        tracing::info!("Audio route observer started ({})", registered);
        *token = Some(registered);

        Ok(())
    }

    fn stop(&self) {
        if let Some(token) = self.token.lock().take() {
            self.session.remove_route_change_listener(token);
            tracing::info!("Audio route observer stopped ({})", token);
        }
    }

    fn is_running(&self) -> bool {
        self.token.lock().is_some()
    }
}

impl Drop for AudioRouteObserver {
    fn drop(&mut self) {
        self.stop();
    }
}
