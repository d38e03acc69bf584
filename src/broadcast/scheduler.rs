//! Broadcast scheduler
//!
//! The broadcast side of the runtime: a tokio task firing on a fixed period
//! (20 Hz by default), independent of the acquisition rate. Each tick it
//! reads a state snapshot, maps it to a command, and if the command is
//! non-empty serializes it and hands it to the subscriber registry for
//! best-effort fan-out. Idle ticks are silent, not heartbeats.
//!
//! The scheduler never retries a failed delivery and never lets a slow
//! subscriber push a tick past its cadence; per-send bounding lives in the
//! registry.

use crate::broadcast::registry::SubscriberRegistry;
use crate::command::map_command;
use crate::config::PilotConfig;
use crate::state::SharedControlState;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Broadcast statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    /// Ticks fired
    pub ticks: u64,
    /// Non-empty commands fanned out
    pub commands_sent: u64,
    /// Individual subscriber deliveries that succeeded
    pub deliveries: u64,
}

/// Inner statistics with atomic counters
#[derive(Debug, Default)]
struct BroadcastStatsInner {
    ticks: AtomicU64,
    commands_sent: AtomicU64,
    deliveries: AtomicU64,
}

impl BroadcastStatsInner {
    fn to_stats(&self) -> BroadcastStats {
        BroadcastStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}

/// Handle to the running broadcast task
pub struct BroadcastScheduler {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    stats: Arc<BroadcastStatsInner>,
}

impl BroadcastScheduler {
    /// Start the broadcast task
    pub fn start(
        config: &PilotConfig,
        state: SharedControlState,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(BroadcastStatsInner::default());

        let task_running = Arc::clone(&running);
        let task_stats = Arc::clone(&stats);
        let period = config.broadcast_period;
        let mapping = config.mapping;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Cadence over catch-up: a late tick is dropped, not bursted.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            while task_running.load(Ordering::Relaxed) {
                interval.tick().await;
                if !task_running.load(Ordering::Relaxed) {
                    break;
                }
                task_stats.ticks.fetch_add(1, Ordering::Relaxed);

                let snapshot = state.snapshot();
                let command = map_command(snapshot.gesture, snapshot.vector, &mapping);
                let Some(message) = command.to_message() else {
                    continue;
                };

                let payload = match serde_json::to_string(&message) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("failed to serialize command: {e}");
                        continue;
                    }
                };

                debug!("broadcasting {:?}: {}", snapshot.gesture, payload);
                let delivered = registry.broadcast(&payload).await;
                task_stats.commands_sent.fetch_add(1, Ordering::Relaxed);
                task_stats
                    .deliveries
                    .fetch_add(delivered as u64, Ordering::Relaxed);
            }

            debug!("broadcast loop exited");
        });

        info!("broadcast scheduler started at {:?} per tick", period);

        Self {
            running,
            handle: Some(handle),
            stats,
        }
    }

    /// Whether the scheduler is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Current statistics
    pub fn stats(&self) -> BroadcastStats {
        self.stats.to_stats()
    }

    /// Stop scheduling further ticks and wait for the task to wind down
    ///
    /// Any in-flight fan-out finishes within the registry's per-send bound;
    /// nothing is awaited indefinitely.
    pub async fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.await.is_err() {
                warn!("broadcast task panicked during shutdown");
            }
        }
        let stats = self.stats();
        info!(
            "broadcast stopped: ticks={}, commands={}, deliveries={}",
            stats.ticks, stats.commands_sent, stats.deliveries
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DirectionVector, Gesture};
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingSubscriber {
        received: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl crate::broadcast::Subscriber for RecordingSubscriber {
        async fn send(&self, payload: &str) -> Result<()> {
            self.received.lock().unwrap().push(payload.to_string());
            Ok(())
        }
    }

    fn fast_config() -> PilotConfig {
        PilotConfig::default().with_broadcast_period(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_idle_state_sends_nothing() {
        let state = SharedControlState::new();
        let registry = Arc::new(SubscriberRegistry::new(Duration::from_millis(50)));
        let subscriber = Arc::new(RecordingSubscriber {
            received: Mutex::new(Vec::new()),
        });
        registry.add(subscriber.clone()).await;

        let mut scheduler = BroadcastScheduler::start(&fast_config(), state, registry);
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop().await;

        let stats = scheduler.stats();
        assert!(stats.ticks > 0);
        assert_eq!(stats.commands_sent, 0);
        assert!(subscriber.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_state_broadcasts_wire_json() {
        let state = SharedControlState::new();
        state.write(Gesture::Fist, DirectionVector::new(1.0, 0.5));

        let registry = Arc::new(SubscriberRegistry::new(Duration::from_millis(50)));
        let subscriber = Arc::new(RecordingSubscriber {
            received: Mutex::new(Vec::new()),
        });
        registry.add(subscriber.clone()).await;

        let mut scheduler = BroadcastScheduler::start(&fast_config(), state, registry);
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop().await;

        let received = subscriber.received.lock().unwrap();
        assert!(!received.is_empty());
        let value: serde_json::Value = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(value["type"], "control");
        assert_eq!(value["move"]["v"], 250);
        assert_eq!(value["move"]["w"], -2.0);
        assert!(value["look"].is_null());
    }

    #[tokio::test]
    async fn test_stop_halts_ticks() {
        let state = SharedControlState::new();
        let registry = Arc::new(SubscriberRegistry::new(Duration::from_millis(50)));
        let mut scheduler = BroadcastScheduler::start(&fast_config(), state, registry);

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop().await;
        assert!(!scheduler.is_running());

        let ticks = scheduler.stats().ticks;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(scheduler.stats().ticks, ticks);
    }
}
