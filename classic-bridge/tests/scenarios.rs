//! End-to-end scenarios driven through the simulated platform
//!
//! Each test wires a module to in-memory OS surfaces, attaches a channel
//! sink as the host, and asserts on what the host receives.

use std::sync::Arc;
use std::thread;

use bridge_observers::simulated::{
    SimulatedAudioSession, SimulatedNowPlaying, SimulatedRadio, SimulatedRemoteCommandCenter,
};
use classic_bridge::{
    AdapterPowerState, AudioRouteEndpoint, BluetoothClassicModule, BridgeConfig, ChannelSink,
    HostEventIterator, Platform, RemoteCommandAction,
};
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    audio: Arc<SimulatedAudioSession>,
    commands: Arc<SimulatedRemoteCommandCenter>,
    now_playing: Arc<SimulatedNowPlaying>,
    radio: Arc<SimulatedRadio>,
    module: BluetoothClassicModule,
    events: HostEventIterator,
}

fn harness() -> Harness {
    let audio = Arc::new(SimulatedAudioSession::new());
    let commands = Arc::new(SimulatedRemoteCommandCenter::new());
    let now_playing = Arc::new(SimulatedNowPlaying::new());
    let radio = Arc::new(SimulatedRadio::with_state(AdapterPowerState::PoweredOff));

    let platform = Platform {
        audio_session: audio.clone(),
        remote_commands: commands.clone(),
        now_playing: now_playing.clone(),
        radio: radio.clone(),
    };

    let module = BluetoothClassicModule::new(BridgeConfig::default(), platform);
    let (sink, events) = ChannelSink::new();
    module.attach_host(Arc::new(sink));
    module.start().unwrap();

    Harness {
        audio,
        commands,
        now_playing,
        radio,
        module,
        events,
    }
}

fn two_outputs() -> Vec<AudioRouteEndpoint> {
    vec![
        AudioRouteEndpoint::new("built-in", "Speaker"),
        AudioRouteEndpoint::new("00:11:22:33:44:55", "Car Stereo"),
    ]
}

// ============================================================================
// Audio route
// ============================================================================

#[test]
fn test_route_disconnect_after_subscribe() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE");

    h.audio.change_route(vec![], 2);

    let delivered: Vec<_> = h.events.try_iter().collect();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].name, "AUDIO_CHANGE");
    assert_eq!(delivered[0].payload, json!({}));
}

#[test]
fn test_route_connect_without_subscribers() {
    let h = harness();

    h.audio.change_route(two_outputs(), 1);

    assert!(h.events.try_recv().is_none());
}

#[test]
fn test_route_connect_emits_each_endpoint() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE");

    h.audio.change_route(two_outputs(), 1);

    let payloads: Vec<_> = h.events.try_iter().map(|e| e.payload).collect();
    assert_eq!(
        payloads,
        vec![
            json!({ "uid": "built-in", "portName": "Speaker" }),
            json!({ "uid": "00:11:22:33:44:55", "portName": "Car Stereo" }),
        ]
    );
}

#[test]
fn test_scoped_listener_does_not_receive_unscoped_route_events() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE@dev123");

    h.audio.change_route(two_outputs(), 1);

    assert!(h.events.try_recv().is_none());
}

#[test]
fn test_current_route_with_zero_listeners() {
    let h = harness();
    h.audio.set_outputs(two_outputs());

    assert_eq!(h.module.get_current_route(), two_outputs());
}

#[test]
fn test_shutdown_stops_route_events() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE");

    h.module.shutdown();
    h.audio.change_route(vec![], 2);

    assert_eq!(h.audio.listener_count(), 0);
    assert!(h.events.try_recv().is_none());
}

#[test]
fn test_detached_host_drops_events() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE");
    h.module.detach_host();

    h.audio.change_route(vec![], 2);

    assert!(h.events.try_recv().is_none());
}

// ============================================================================
// Remote commands
// ============================================================================

#[test]
fn test_play_command_after_lyrics() {
    let h = harness();
    h.module.add_listener("DEVICE_ACTION");
    h.module.send_lyrics("first verse");

    let status = h.commands.invoke(RemoteCommandAction::Play);

    assert_eq!(status, Some(bridge_observers::CommandStatus::Success));
    let delivered: Vec<_> = h.events.try_iter().collect();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].name, "DEVICE_ACTION");
    assert_eq!(delivered[0].payload, json!({ "action": "play" }));
}

#[test]
fn test_handlers_absent_until_first_lyrics() {
    let h = harness();
    assert_eq!(h.commands.handler_count(), 0);

    h.module.send_lyrics("one");
    h.module.send_lyrics("two");

    assert_eq!(h.commands.handler_count(), 4);
    assert_eq!(h.commands.set_handler_calls(), 4);
    assert_eq!(h.now_playing.title().as_deref(), Some("two"));
}

#[test]
fn test_lyrics_written_when_handler_registration_fails() {
    let h = harness();
    h.module.add_listener("DEVICE_ACTION");
    h.commands.fail_next_registration(RemoteCommandAction::Prev);

    h.module.send_lyrics("first verse");

    assert_eq!(h.now_playing.title().as_deref(), Some("first verse"));
    assert_eq!(h.commands.handler_count(), 0);
    assert_eq!(h.commands.invoke(RemoteCommandAction::Play), None);

    h.module.send_lyrics("second verse");

    assert_eq!(h.now_playing.title().as_deref(), Some("second verse"));
    assert_eq!(h.commands.handler_count(), 4);
    h.commands.invoke(RemoteCommandAction::Prev);
    let delivered: Vec<_> = h.events.try_iter().collect();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].payload, json!({ "action": "prev" }));
}

// ============================================================================
// Adapter state
// ============================================================================

#[test]
fn test_adapter_state() {
    let h = harness();
    assert!(!h.module.is_bluetooth_enabled());

    h.radio.set_state(AdapterPowerState::PoweredOn);
    assert!(h.module.is_bluetooth_enabled());

    h.radio.set_state(AdapterPowerState::Unauthorized);
    assert!(!h.module.is_bluetooth_enabled());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_notifications_and_listener_changes() {
    let h = harness();
    h.module.add_listener("AUDIO_CHANGE");
    let module = &h.module;
    let audio = &h.audio;

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    audio.post(&bridge_observers::RouteChangeNotification::with_reason(2));
                }
            });
        }
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    module.add_listener("DEVICE_ACTION@dev");
                    module.remove_listener("DEVICE_ACTION@dev");
                }
            });
        }
    });

    assert_eq!(h.events.try_iter().count(), 400);
    assert_eq!(h.module.listener_count("DEVICE_ACTION@dev"), 0);
    assert_eq!(h.module.listener_count("AUDIO_CHANGE"), 1);
}
