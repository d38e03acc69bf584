//! Subscriber registry
//!
//! Tracks the clients currently subscribed to command broadcasts and
//! performs the fan-out. Delivery is best-effort with per-subscriber failure
//! isolation: one failing or hung subscriber never blocks delivery to the
//! rest, and never delays the next tick beyond the configured per-send
//! timeout.
//!
//! Failed subscriber handles are collected during a broadcast and pruned
//! after the iteration completes, never mid-iteration, so the subscriber
//! collection is never mutated while it is being walked.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Opaque handle identifying one registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A broadcast recipient
///
/// Implementations wrap whatever delivery mechanism a client uses (a
/// WebSocket writer queue, a test recorder). `send` should complete quickly;
/// the registry bounds it with a timeout regardless.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Deliver one serialized command payload
    async fn send(&self, payload: &str) -> Result<()>;
}

/// Registry of currently connected subscribers
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, Arc<dyn Subscriber>>>,
    next_id: AtomicU64,
    send_timeout: Duration,
}

impl SubscriberRegistry {
    /// Create an empty registry with the given per-send timeout
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            send_timeout,
        }
    }

    /// Register a subscriber, returning its handle
    pub async fn add(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().await.insert(id, subscriber);
        debug!("subscriber {:?} registered", id);
        id
    }

    /// Remove a subscriber; returns whether it was registered
    pub async fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id).is_some();
        if removed {
            debug!("subscriber {:?} removed", id);
        }
        removed
    }

    /// Number of currently registered subscribers
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Whether no subscribers are registered
    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }

    /// Fan a payload out to every current subscriber
    ///
    /// Returns the number of successful deliveries. Failures and per-send
    /// timeouts are logged, isolated, and the offending subscribers pruned
    /// once the iteration is over.
    pub async fn broadcast(&self, payload: &str) -> usize {
        let current: Vec<(SubscriberId, Arc<dyn Subscriber>)> = {
            let guard = self.subscribers.read().await;
            guard.iter().map(|(id, sub)| (*id, Arc::clone(sub))).collect()
        };

        let mut delivered = 0;
        let mut failed: Vec<SubscriberId> = Vec::new();

        for (id, subscriber) in current {
            match tokio::time::timeout(self.send_timeout, subscriber.send(payload)).await {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!("send to subscriber {:?} failed: {e}", id);
                    failed.push(id);
                }
                Err(_) => {
                    warn!(
                        "send to subscriber {:?} timed out after {:?}",
                        id, self.send_timeout
                    );
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut guard = self.subscribers.write().await;
            for id in &failed {
                guard.remove(id);
            }
            info!("pruned {} failed subscriber(s)", failed.len());
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PilotError;
    use std::sync::Mutex;

    /// Subscriber recording every payload it receives
    struct RecordingSubscriber {
        received: Mutex<Vec<String>>,
    }

    impl RecordingSubscriber {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                received: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Subscriber for RecordingSubscriber {
        async fn send(&self, payload: &str) -> Result<()> {
            self.received.lock().unwrap().push(payload.to_string());
            Ok(())
        }
    }

    /// Subscriber whose sends always fail
    struct FailingSubscriber;

    #[async_trait]
    impl Subscriber for FailingSubscriber {
        async fn send(&self, _payload: &str) -> Result<()> {
            Err(PilotError::subscriber("connection gone"))
        }
    }

    /// Subscriber that never completes a send
    struct HangingSubscriber;

    #[async_trait]
    impl Subscriber for HangingSubscriber {
        async fn send(&self, _payload: &str) -> Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn registry() -> SubscriberRegistry {
        SubscriberRegistry::new(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_add_remove() {
        let registry = registry();
        assert!(registry.is_empty().await);

        let id = registry.add(RecordingSubscriber::new()).await;
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all() {
        let registry = registry();
        let a = RecordingSubscriber::new();
        let b = RecordingSubscriber::new();
        registry.add(a.clone()).await;
        registry.add(b.clone()).await;

        let delivered = registry.broadcast("payload-1").await;
        assert_eq!(delivered, 2);
        assert_eq!(*a.received.lock().unwrap(), vec!["payload-1"]);
        assert_eq!(*b.received.lock().unwrap(), vec!["payload-1"]);
    }

    #[tokio::test]
    async fn test_failing_subscriber_is_isolated_and_pruned() {
        let registry = registry();
        registry.add(Arc::new(FailingSubscriber)).await;
        let ok = RecordingSubscriber::new();
        registry.add(ok.clone()).await;

        let delivered = registry.broadcast("cmd").await;
        assert_eq!(delivered, 1);
        assert_eq!(*ok.received.lock().unwrap(), vec!["cmd"]);

        // The failed handle was pruned after the iteration.
        assert_eq!(registry.len().await, 1);

        let delivered = registry.broadcast("cmd-2").await;
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_hung_subscriber_is_bounded_and_pruned() {
        let registry = registry();
        registry.add(Arc::new(HangingSubscriber)).await;
        let ok = RecordingSubscriber::new();
        registry.add(ok.clone()).await;

        let start = std::time::Instant::now();
        let delivered = registry.broadcast("cmd").await;
        assert_eq!(delivered, 1);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry() {
        let registry = registry();
        assert_eq!(registry.broadcast("cmd").await, 0);
    }
}
