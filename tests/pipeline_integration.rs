//! Runtime integration tests
//!
//! Drives the full runtime (acquisition thread + broadcast task) with fake
//! frame sources, detectors and subscribers, and checks the end-to-end
//! contract: gesture readings become wire commands, empty commands stay off
//! the channel, failures stay isolated, and shutdown is cooperative.


use handpilot_core::command::Gesture;
use handpilot_core::config::PilotConfig;
use handpilot_core::runtime::PilotRuntime;
use handpilot_core::vision::{Frame, FrameSource, NullDetector, StaticFrameSource};
use pilot_test_utils::*;
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> PilotConfig {
    PilotConfig::default()
        .with_frame_period(Duration::from_millis(1))
        .with_broadcast_period(Duration::from_millis(5))
}

fn looping_source() -> Option<Box<dyn FrameSource>> {
    Some(Box::new(
        StaticFrameSource::new(vec![Frame::black(8, 8)]).looping(),
    ))
}

#[tokio::test]
async fn test_fist_becomes_drive_command() {
    let mut runtime = PilotRuntime::new(fast_config());
    let subscriber = RecordingSubscriber::new();
    runtime.registry().add(subscriber.clone()).await;

    // Centroid at (1.0, 0.25): vx = 1.0, vy = 0.5 after inversion.
    runtime
        .start(
            looping_source(),
            Box::new(ConstantDetector::new(Some(fist_at(1.0, 0.25)))),
            None,
        )
        .unwrap();

    wait_for(|| !subscriber.payloads().is_empty(), "first broadcast").await;
    runtime.stop().await.unwrap();

    let payloads = subscriber.payloads();
    let value: serde_json::Value = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(value["type"], "control");
    assert_eq!(value["move"]["v"], 250);
    assert_eq!(value["move"]["w"], -2.0);
    assert!(value["look"].is_null());
}

#[tokio::test]
async fn test_palm_becomes_look_command() {
    let mut runtime = PilotRuntime::new(fast_config());
    let subscriber = RecordingSubscriber::new();
    runtime.registry().add(subscriber.clone()).await;

    // Centroid at (0.0, 0.0): vx = -1.0, vy = 1.0 after inversion.
    runtime
        .start(
            looping_source(),
            Box::new(ConstantDetector::new(Some(palm_at(0.0, 0.0)))),
            None,
        )
        .unwrap();

    wait_for(|| !subscriber.payloads().is_empty(), "first broadcast").await;
    runtime.stop().await.unwrap();

    let payloads = subscriber.payloads();
    let value: serde_json::Value = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(value["type"], "control");
    assert!(value["move"].is_null());
    assert_eq!(value["look"]["pan"], 90);
    assert_eq!(value["look"]["tilt"], 45);
}

#[tokio::test]
async fn test_no_hand_broadcasts_nothing() {
    let mut runtime = PilotRuntime::new(fast_config());
    let subscriber = RecordingSubscriber::new();
    runtime.registry().add(subscriber.clone()).await;

    runtime
        .start(
            looping_source(),
            Box::new(ConstantDetector::new(None)),
            None,
        )
        .unwrap();

    wait_for(|| runtime.stats().broadcast.ticks >= 10, "broadcast ticks").await;
    let stats = runtime.stats();
    runtime.stop().await.unwrap();

    assert_eq!(stats.broadcast.commands_sent, 0);
    assert!(subscriber.payloads().is_empty());
}

#[tokio::test]
async fn test_centered_hand_is_suppressed() {
    // An active gesture with zero displacement maps to an empty command,
    // which never reaches the channel.
    let mut runtime = PilotRuntime::new(fast_config());
    let subscriber = RecordingSubscriber::new();
    runtime.registry().add(subscriber.clone()).await;

    runtime
        .start(
            looping_source(),
            Box::new(ConstantDetector::new(Some(fist_at(0.5, 0.5)))),
            None,
        )
        .unwrap();

    wait_for(|| runtime.stats().broadcast.ticks >= 10, "broadcast ticks").await;
    runtime.stop().await.unwrap();

    assert!(subscriber.payloads().is_empty());
}

#[tokio::test]
async fn test_failing_subscriber_is_isolated() {
    let mut runtime = PilotRuntime::new(fast_config());
    let registry = runtime.registry();
    registry.add(Arc::new(FailingSubscriber)).await;
    let ok = RecordingSubscriber::new();
    registry.add(ok.clone()).await;

    runtime
        .start(
            looping_source(),
            Box::new(ConstantDetector::new(Some(fist_at(1.0, 0.25)))),
            None,
        )
        .unwrap();

    wait_for(|| !ok.payloads().is_empty(), "delivery to healthy subscriber").await;
    runtime.stop().await.unwrap();

    // The failing handle was pruned after the first fan-out.
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn test_hand_loss_resets_state() {
    let mut runtime = PilotRuntime::new(fast_config());
    let state = runtime.state();

    // One frame with a hand, then the detector reports nothing forever.
    runtime
        .start(
            looping_source(),
            Box::new(ScriptedDetector::new(vec![Ok(Some(fist_at(1.0, 0.25)))])),
            None,
        )
        .unwrap();

    wait_for(
        || state.snapshot().gesture == Gesture::None && runtime.stats().acquisition.frames_read >= 2,
        "state reset after hand loss",
    )
    .await;
    let snap = state.snapshot();
    runtime.stop().await.unwrap();

    assert_eq!(snap.gesture, Gesture::None);
    assert!(snap.vector.is_zero());
}

#[tokio::test]
async fn test_degraded_mode_without_camera() {
    let mut config = fast_config();
    config.idle_poll_period = Duration::from_millis(1);
    let mut runtime = PilotRuntime::new(config);
    let subscriber = RecordingSubscriber::new();
    runtime.registry().add(subscriber.clone()).await;

    runtime.start(None, Box::new(NullDetector), None).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(runtime.is_running());
    assert_eq!(runtime.stats().acquisition.frames_read, 0);
    assert!(subscriber.payloads().is_empty());

    runtime.stop().await.unwrap();
    assert!(!runtime.is_running());
}
