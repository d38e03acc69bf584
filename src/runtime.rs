//! Pilot runtime
//!
//! The runtime context object: constructed once at startup, it owns the
//! shared control-state cell and the subscriber registry, and starts/stops
//! the two execution contexts (acquisition thread, broadcast task). Handles
//! to the runtime are passed into collaborators explicitly; there is no
//! process-wide singleton.
//!
//! ## Example
//!
//! ```rust,no_run
//! use handpilot_core::config::PilotConfig;
//! use handpilot_core::runtime::PilotRuntime;
//! use handpilot_core::vision::{NullDetector, StaticFrameSource};
//!
//! # async fn example() -> handpilot_core::error::Result<()> {
//! let mut runtime = PilotRuntime::new(PilotConfig::default());
//! runtime.start(
//!     Some(Box::new(StaticFrameSource::default())),
//!     Box::new(NullDetector),
//!     None,
//! )?;
//!
//! // ... serve the realtime channel against runtime.registry() ...
//!
//! runtime.stop().await?;
//! # Ok(())
//! # }
//! ```

use crate::broadcast::{BroadcastScheduler, BroadcastStats, SubscriberRegistry};
use crate::config::PilotConfig;
use crate::error::{PilotError, Result};
use crate::pipeline::{AcquisitionPipeline, AcquisitionStats, FrameObserver};
use crate::state::SharedControlState;
use crate::vision::{FrameSource, HandDetector};
use std::sync::Arc;
use tracing::info;

/// Combined runtime statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub acquisition: AcquisitionStats,
    pub broadcast: BroadcastStats,
}

/// The gesture-control runtime
///
/// Owns the shared state and registry for its whole lifetime; the execution
/// contexts exist only between `start` and `stop`.
pub struct PilotRuntime {
    config: PilotConfig,
    state: SharedControlState,
    registry: Arc<SubscriberRegistry>,
    acquisition: Option<AcquisitionPipeline>,
    scheduler: Option<BroadcastScheduler>,
}

impl PilotRuntime {
    /// Create a runtime from a configuration
    pub fn new(config: PilotConfig) -> Self {
        let registry = Arc::new(SubscriberRegistry::new(config.send_timeout));
        Self {
            config,
            state: SharedControlState::new(),
            registry,
            acquisition: None,
            scheduler: None,
        }
    }

    /// The runtime configuration
    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    /// Handle to the shared control state
    pub fn state(&self) -> SharedControlState {
        self.state.clone()
    }

    /// Handle to the subscriber registry
    pub fn registry(&self) -> Arc<SubscriberRegistry> {
        Arc::clone(&self.registry)
    }

    /// Whether both contexts are running
    pub fn is_running(&self) -> bool {
        self.acquisition.is_some()
    }

    /// Current statistics from both contexts
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            acquisition: self
                .acquisition
                .as_ref()
                .map(|a| a.stats())
                .unwrap_or_default(),
            broadcast: self
                .scheduler
                .as_ref()
                .map(|s| s.stats())
                .unwrap_or_default(),
        }
    }

    /// Start the acquisition and broadcast contexts
    ///
    /// `source` is `None` when the camera could not be opened; acquisition
    /// then idles in degraded mode. Must be called from within a tokio
    /// runtime (the broadcast task is spawned on it).
    pub fn start(
        &mut self,
        source: Option<Box<dyn FrameSource>>,
        detector: Box<dyn HandDetector>,
        observer: Option<Box<dyn FrameObserver>>,
    ) -> Result<()> {
        if self.is_running() {
            return Err(PilotError::AlreadyRunning);
        }

        info!(
            "starting pilot runtime (frame period {:?}, broadcast period {:?})",
            self.config.frame_period, self.config.broadcast_period
        );

        self.acquisition = Some(AcquisitionPipeline::start(
            &self.config,
            source,
            detector,
            self.state.clone(),
            observer,
        ));
        self.scheduler = Some(BroadcastScheduler::start(
            &self.config,
            self.state.clone(),
            Arc::clone(&self.registry),
        ));

        Ok(())
    }

    /// Stop both contexts cooperatively
    ///
    /// The acquisition thread releases the camera before this returns; the
    /// broadcast task stops scheduling ticks without awaiting in-flight
    /// sends beyond their per-send bound.
    pub async fn stop(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(PilotError::NotRunning);
        }

        info!("stopping pilot runtime");

        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop().await;
        }
        if let Some(mut acquisition) = self.acquisition.take() {
            acquisition.stop();
        }

        Ok(())
    }
}
