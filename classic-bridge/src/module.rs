//! BluetoothClassicModule - the host-facing entry point
//!
//! Owns the listener registry, the router, and the observers that feed it,
//! and exposes the commands a host bridge calls.

use std::collections::HashMap;
use std::sync::Arc;

use bridge_events::{EventRouter, HostSink, ListenerRegistry, QualifiedEventKey};
use bridge_observers::{
    AdapterStateMonitor, AudioRouteEndpoint, AudioRouteObserver, AudioSession, NowPlayingCenter,
    Observer, RadioManager, RemoteCommandBridge, RemoteCommandCenter,
};

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::logging;

/// The OS surfaces the module talks to
///
/// Building the radio manager is where any first-time bluetooth permission
/// prompt happens, so hosts decide when that is by choosing when to build
/// the platform.
#[derive(Clone)]
pub struct Platform {
    pub audio_session: Arc<dyn AudioSession>,
    pub remote_commands: Arc<dyn RemoteCommandCenter>,
    pub now_playing: Arc<dyn NowPlayingCenter>,
    pub radio: Arc<dyn RadioManager>,
}

/// Host-facing module
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use bridge_events::ChannelSink;
/// use classic_bridge::{BluetoothClassicModule, BridgeConfig};
///
/// let module = BluetoothClassicModule::new(BridgeConfig::default(), platform);
/// let (sink, events) = ChannelSink::new();
/// module.attach_host(Arc::new(sink));
/// module.start()?;
///
/// module.add_listener("AUDIO_CHANGE");
/// for event in events {
///     println!("{}: {}", event.name, event.payload);
/// }
/// ```
pub struct BluetoothClassicModule {
    config: BridgeConfig,
    registry: Arc<ListenerRegistry>,
    router: Arc<EventRouter>,
    audio_route: AudioRouteObserver,
    remote_commands: RemoteCommandBridge,
    adapter: AdapterStateMonitor,
}

impl BluetoothClassicModule {
    pub fn new(config: BridgeConfig, platform: Platform) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        let router = Arc::new(
            EventRouter::new(Arc::clone(&registry)).with_skip_logging(config.log_skipped_emissions),
        );

        let audio_route = AudioRouteObserver::new(platform.audio_session, Arc::clone(&router));
        let remote_commands = RemoteCommandBridge::new(
            platform.remote_commands,
            platform.now_playing,
            Arc::clone(&router),
        );
        let adapter = AdapterStateMonitor::new(platform.radio);

        Self {
            config,
            registry,
            router,
            audio_route,
            remote_commands,
            adapter,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.config.module_name
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Attach observers to their OS surfaces
    ///
    /// Also installs the configured logging when no subscriber exists yet.
    pub fn start(&self) -> Result<()> {
        if !logging::is_initialized() {
            let filter = self.config.log_filter.as_deref();
            if let Err(e) = logging::init_logging(self.config.logging, filter) {
                tracing::warn!("{}", e);
            }
        }

        self.audio_route.start()?;
        if self.config.register_remote_commands_eagerly {
            self.remote_commands.start()?;
        }

        tracing::info!("{} started", self.config.module_name);
        Ok(())
    }

    /// Detach every observer and the host boundary
    pub fn shutdown(&self) {
        self.audio_route.stop();
        self.remote_commands.stop();
        self.router.detach();
        tracing::info!("{} shut down", self.config.module_name);
    }

    pub fn attach_host(&self, sink: Arc<dyn HostSink>) {
        self.router.attach(sink);
    }

    pub fn detach_host(&self) {
        self.router.detach();
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    pub fn observers(&self) -> [&dyn Observer; 2] {
        [&self.audio_route, &self.remote_commands]
    }

    /// Resolves with the adapter power state; never fails
    pub fn is_bluetooth_enabled(&self) -> bool {
        self.adapter.is_enabled()
    }

    /// Outputs of the current audio route, independent of listeners
    pub fn get_current_route(&self) -> Vec<AudioRouteEndpoint> {
        self.audio_route.current_route()
    }

    /// Publish lyric text as the now-playing title
    pub fn send_lyrics(&self, text: &str) {
        self.remote_commands.publish_now_playing(text);
    }

    /// Register a listener for `<EventType>` or `<EventType>@<scope>`
    ///
    /// Unknown event names are ignored; the registry logs them.
    pub fn add_listener(&self, name: &str) {
        self.registry.add_listener(name).ok();
    }

    pub fn remove_listener(&self, name: &str) {
        // Unknown names already logged by the registry
        self.registry.remove_listener(name).ok();
    }

    /// Release one listener registration for `name`
    ///
    /// Despite the name this drops a single registration, exactly like
    /// `remove_listener`; hosts that want a channel silenced call it once
    /// per `add_listener`.
    pub fn remove_all_listeners(&self, name: &str) {
        // Unknown names already logged by the registry
        self.registry.remove_listener(name).ok();
    }

    /// Canonical names of every event a host may listen for
    pub fn supported_events(&self) -> Vec<&'static str> {
        bridge_events::supported_events()
    }

    /// Current listener count for `name`; 0 for unknown event names
    pub fn listener_count(&self, name: &str) -> usize {
        QualifiedEventKey::parse(name)
            .map(|key| self.registry.count(&key))
            .unwrap_or(0)
    }

    /// Snapshot of every channel seen so far and its listener count
    pub fn listener_stats(&self) -> HashMap<QualifiedEventKey, usize> {
        self.registry.stats()
    }
}

impl Drop for BluetoothClassicModule {
    fn drop(&mut self) {
        tracing::debug!(
            "{} dropping, {} active channels",
            self.config.module_name,
            self.registry.active_channels()
        );
        self.shutdown();
    }
}
