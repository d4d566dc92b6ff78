//! Lock-screen transport controls and the now-playing surface
//!
//! The OS invokes the registered handlers when the user presses play,
//! pause, next or previous on the lock screen; each press becomes a
//! `DEVICE_ACTION` event. Lyric text is published as the now-playing title.

use std::fmt;
use std::sync::Arc;

use bridge_events::{EventKind, EventRouter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::observer::Observer;

/// Transport control pressed on the lock screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteCommandAction {
    Play,
    Pause,
    Next,
    Prev,
}

impl RemoteCommandAction {
    pub const ALL: [RemoteCommandAction; 4] = [
        RemoteCommandAction::Play,
        RemoteCommandAction::Pause,
        RemoteCommandAction::Next,
        RemoteCommandAction::Prev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteCommandAction::Play => "play",
            RemoteCommandAction::Pause => "pause",
            RemoteCommandAction::Next => "next",
            RemoteCommandAction::Prev => "prev",
        }
    }
}

impl fmt::Display for RemoteCommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reported back to the OS command surface
///
/// Handlers always succeed; whether anyone was listening is not the OS's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
}

/// `DEVICE_ACTION` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceActionPayload {
    pub action: RemoteCommandAction,
}

pub type CommandHandler = Arc<dyn Fn() -> CommandStatus + Send + Sync>;

/// The OS remote-command surface
///
/// `set_handler` replaces whatever handler was previously set for the same
/// action; handlers never stack.
pub trait RemoteCommandCenter: Send + Sync {
    fn set_handler(&self, action: RemoteCommandAction, handler: CommandHandler) -> Result<()>;

    fn remove_handler(&self, action: RemoteCommandAction);
}

/// The OS now-playing metadata surface
pub trait NowPlayingCenter: Send + Sync {
    /// Overwrite the title field
    fn set_title(&self, title: &str);
}

pub struct RemoteCommandBridge {
    commands: Arc<dyn RemoteCommandCenter>,
    now_playing: Arc<dyn NowPlayingCenter>,
    router: Arc<EventRouter>,
    registered: Mutex<bool>,
}

impl RemoteCommandBridge {
    pub fn new(
        commands: Arc<dyn RemoteCommandCenter>,
        now_playing: Arc<dyn NowPlayingCenter>,
        router: Arc<EventRouter>,
    ) -> Self {
        Self {
            commands,
            now_playing,
            router,
            registered: Mutex::new(false),
        }
    }

    /// Register the four transport handlers unless already registered
    ///
    /// Registration is all or nothing: if the OS rejects one action, the
    /// handlers already set in this pass are removed before the error is
    /// returned.
    pub fn register_handlers(&self) -> Result<()> {
        let mut registered = self.registered.lock();
        if *registered {
            return Ok(());
        }

        for (installed, action) in RemoteCommandAction::ALL.into_iter().enumerate() {
            let router = Arc::clone(&self.router);
            let handler: CommandHandler = Arc::new(move || {
                router.emit(EventKind::DeviceAction, None, &DeviceActionPayload { action });
                CommandStatus::Success
            });

            if let Err(e) = self.commands.set_handler(action, handler) {
                for earlier in &RemoteCommandAction::ALL[..installed] {
                    self.commands.remove_handler(*earlier);
                }
                tracing::warn!("Rejected {} handler, rolled back {} others", action, installed);
                return Err(e);
            }
        }

        *registered = true;
        tracing::info!("Remote command handlers registered");

        Ok(())
    }

    pub fn handlers_registered(&self) -> bool {
        *self.registered.lock()
    }

    /// Write `text` as the now-playing title
    ///
    /// The first call also registers the transport handlers. A registration
    /// failure is logged; the title is written either way.
    pub fn publish_now_playing(&self, text: &str) {
        if let Err(e) = self.register_handlers() {
            tracing::warn!("Failed to register remote command handlers: {}", e);
        }

        self.now_playing.set_title(text);
        tracing::trace!("Now playing title updated ({} bytes)", text.len());
    }
}

impl Observer for RemoteCommandBridge {
    fn name(&self) -> &'static str {
        "remote-command"
    }

    fn start(&self) -> Result<()> {
        self.register_handlers()
    }

    fn stop(&self) {
        let mut registered = self.registered.lock();

        // Removing an absent handler is a no-op on the OS side
        for action in RemoteCommandAction::ALL {
            self.commands.remove_handler(action);
        }

        if std::mem::replace(&mut *registered, false) {
            tracing::info!("Remote command handlers removed");
        }
    }

    fn is_running(&self) -> bool {
        self.handlers_registered()
    }
}
