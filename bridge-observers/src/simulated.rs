//! In-memory platform surfaces
//!
//! Stand-ins for the OS audio session, remote command center, now-playing
//! center and radio manager. Tests drive them directly; headless hosts can
//! use them where no real surface exists.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::adapter::{AdapterPowerState, RadioManager};
use crate::audio_route::{
    AudioRouteEndpoint, AudioSession, ListenerToken, RouteChangeCallback, RouteChangeNotification,
};
use crate::error::{ObserverError, Result};
use crate::remote_command::{
    CommandHandler, CommandStatus, NowPlayingCenter, RemoteCommandAction, RemoteCommandCenter,
};

#[derive(Default)]
pub struct SimulatedAudioSession {
    outputs: Mutex<Vec<AudioRouteEndpoint>>,
    listeners: Mutex<HashMap<ListenerToken, RouteChangeCallback>>,
    next_token: AtomicU64,
    reject_next: AtomicBool,
}

impl SimulatedAudioSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outputs(&self, outputs: Vec<AudioRouteEndpoint>) {
        *self.outputs.lock() = outputs;
    }

    /// Deliver a notification to every registered listener
    pub fn post(&self, notification: &RouteChangeNotification) {
        let callbacks: Vec<_> = self.listeners.lock().values().cloned().collect();
        for callback in callbacks {
            callback(notification);
        }
    }

    /// Replace the outputs and post a route change with the given reason
    pub fn change_route(&self, outputs: Vec<AudioRouteEndpoint>, reason: u64) {
        self.set_outputs(outputs);
        self.post(&RouteChangeNotification::with_reason(reason));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Make the next `add_route_change_listener` call fail
    pub fn fail_next_registration(&self) {
        self.reject_next.store(true, Ordering::Relaxed);
    }
}

impl AudioSession for SimulatedAudioSession {
    fn current_outputs(&self) -> Vec<AudioRouteEndpoint> {
        self.outputs.lock().clone()
    }

    fn add_route_change_listener(&self, callback: RouteChangeCallback) -> Result<ListenerToken> {
        if self.reject_next.swap(false, Ordering::Relaxed) {
            return Err(ObserverError::Unavailable {
                surface: "audio session",
                reason: "route change observer rejected".to_string(),
            });
        }

        let token = ListenerToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(token, callback);
        Ok(token)
    }

    fn remove_route_change_listener(&self, token: ListenerToken) {
        self.listeners.lock().remove(&token);
    }
}

#[derive(Default)]
pub struct SimulatedRemoteCommandCenter {
    handlers: Mutex<HashMap<RemoteCommandAction, CommandHandler>>,
    set_calls: AtomicUsize,
    reject: Mutex<Option<RemoteCommandAction>>,
}

impl SimulatedRemoteCommandCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press a transport control; `None` when no handler is set
    pub fn invoke(&self, action: RemoteCommandAction) -> Option<CommandStatus> {
        let handler = self.handlers.lock().get(&action).cloned()?;
        Some(handler())
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Total `set_handler` calls, including replacements
    pub fn set_handler_calls(&self) -> usize {
        self.set_calls.load(Ordering::Relaxed)
    }

    /// Make the next `set_handler` call for `action` fail
    ///
    /// Handlers set earlier in the same registration pass stay installed,
    /// the way a real command center leaves them.
    pub fn fail_next_registration(&self, action: RemoteCommandAction) {
        *self.reject.lock() = Some(action);
    }
}

impl RemoteCommandCenter for SimulatedRemoteCommandCenter {
    fn set_handler(&self, action: RemoteCommandAction, handler: CommandHandler) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::Relaxed);

        let mut reject = self.reject.lock();
        if *reject == Some(action) {
            *reject = None;
            return Err(ObserverError::Unavailable {
                surface: "remote command center",
                reason: format!("{} handler rejected", action),
            });
        }
        drop(reject);

        self.handlers.lock().insert(action, handler);
        Ok(())
    }

    fn remove_handler(&self, action: RemoteCommandAction) {
        self.handlers.lock().remove(&action);
    }
}

#[derive(Default)]
pub struct SimulatedNowPlaying {
    title: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl SimulatedNowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<String> {
        self.title.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl NowPlayingCenter for SimulatedNowPlaying {
    fn set_title(&self, title: &str) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        *self.title.lock() = Some(title.to_string());
    }
}

#[derive(Default)]
pub struct SimulatedRadio {
    state: Mutex<AdapterPowerState>,
}

impl SimulatedRadio {
    pub fn with_state(state: AdapterPowerState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set_state(&self, state: AdapterPowerState) {
        *self.state.lock() = state;
    }
}

impl RadioManager for SimulatedRadio {
    fn power_state(&self) -> AdapterPowerState {
        *self.state.lock()
    }
}
