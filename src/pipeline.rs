//! Acquisition pipeline
//!
//! The acquisition side of the runtime: a dedicated OS thread (camera reads
//! and detector inference are blocking) that loops for the life of the
//! process:
//!
//! ```text
//! acquire frame -> mirror -> detect -> classify -> write shared state
//!                                   -> (optional frame observer)
//! ```
//!
//! Timing is best-effort and independent of the broadcast cadence. When no
//! camera is available the thread idles at a low poll rate with the shared
//! state settled to the no-hand reading, instead of busy-looping.
//!
//! Error policy per frame: a transient read failure skips the frame; a
//! detector failure counts as "no hand". Neither stops the loop.

use crate::command::{DirectionVector, Gesture};
use crate::config::PilotConfig;
use crate::state::SharedControlState;
use crate::vision::{classify, Frame, FrameSource, HandDetector};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Observer of each processed frame
///
/// A diagnostic sink for operator-facing debug views. It sees the mirrored
/// frame together with the reading classified from it. Observers are optional
/// and independently toggleable; their absence never alters classification.
pub trait FrameObserver: Send {
    /// Called once per processed frame, after the shared state was updated
    fn on_frame(&mut self, frame: &Frame, gesture: Gesture, vector: DirectionVector);
}

/// Acquisition statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// Frames successfully read from the source
    pub frames_read: u64,
    /// Transient read failures (frame skipped)
    pub read_errors: u64,
    /// Frames in which the detector reported a hand
    pub hands_detected: u64,
    /// Detector failures downgraded to "no hand"
    pub detector_errors: u64,
}

/// Inner statistics with atomic counters
#[derive(Debug, Default)]
struct AcquisitionStatsInner {
    frames_read: AtomicU64,
    read_errors: AtomicU64,
    hands_detected: AtomicU64,
    detector_errors: AtomicU64,
}

impl AcquisitionStatsInner {
    fn to_stats(&self) -> AcquisitionStats {
        AcquisitionStats {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            hands_detected: self.hands_detected.load(Ordering::Relaxed),
            detector_errors: self.detector_errors.load(Ordering::Relaxed),
        }
    }
}

/// Handle to the running acquisition thread
///
/// Constructed via [`AcquisitionPipeline::start`]; [`stop`](Self::stop) is
/// cooperative and joins the thread, which drops the frame source and with it
/// the camera device.
pub struct AcquisitionPipeline {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    stats: Arc<AcquisitionStatsInner>,
}

impl AcquisitionPipeline {
    /// Start the acquisition thread
    ///
    /// `source` is `None` when the camera could not be opened; the thread
    /// then runs in degraded idle mode, keeping the shared state at the
    /// no-hand reading and polling at `idle_poll_period`.
    pub fn start(
        config: &PilotConfig,
        source: Option<Box<dyn FrameSource>>,
        detector: Box<dyn HandDetector>,
        state: SharedControlState,
        observer: Option<Box<dyn FrameObserver>>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(AcquisitionStatsInner::default());

        if source.is_none() {
            warn!("no camera available, acquisition runs in degraded idle mode");
        }

        let thread_running = Arc::clone(&running);
        let thread_stats = Arc::clone(&stats);
        let frame_period = config.frame_period;
        let idle_poll_period = config.idle_poll_period;
        let classifier = config.classifier;

        let handle = thread::Builder::new()
            .name("handpilot-acquisition".to_string())
            .spawn(move || {
                acquisition_loop(
                    thread_running,
                    thread_stats,
                    source,
                    detector,
                    state,
                    observer,
                    frame_period,
                    idle_poll_period,
                    classifier,
                );
            })
            .expect("failed to spawn acquisition thread");

        info!("acquisition pipeline started");

        Self {
            running,
            handle: Some(handle),
            stats,
        }
    }

    /// Whether the acquisition thread is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Current statistics
    pub fn stats(&self) -> AcquisitionStats {
        self.stats.to_stats()
    }

    /// Signal the thread to stop and wait for it to release the camera
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("acquisition thread panicked during shutdown");
            }
            let stats = self.stats();
            info!(
                "acquisition stopped: read={}, read_errors={}, hands={}, detector_errors={}",
                stats.frames_read, stats.read_errors, stats.hands_detected, stats.detector_errors
            );
        }
    }
}

impl Drop for AcquisitionPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

#[allow(clippy::too_many_arguments)]
fn acquisition_loop(
    running: Arc<AtomicBool>,
    stats: Arc<AcquisitionStatsInner>,
    mut source: Option<Box<dyn FrameSource>>,
    mut detector: Box<dyn HandDetector>,
    state: SharedControlState,
    mut observer: Option<Box<dyn FrameObserver>>,
    frame_period: std::time::Duration,
    idle_poll_period: std::time::Duration,
    classifier: crate::config::ClassifierConfig,
) {
    state.reset();

    while running.load(Ordering::Relaxed) {
        let Some(src) = source.as_mut() else {
            // Degraded mode: no camera, poll slowly rather than spin.
            thread::sleep(idle_poll_period);
            continue;
        };

        let mut frame = match src.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                thread::sleep(frame_period);
                continue;
            }
            Err(e) => {
                stats.read_errors.fetch_add(1, Ordering::Relaxed);
                warn!("frame read failed, skipping: {e}");
                thread::sleep(frame_period);
                continue;
            }
        };
        stats.frames_read.fetch_add(1, Ordering::Relaxed);

        // The feed is a mirror for the operator.
        frame.flip_horizontal();

        let landmarks = match detector.detect(&frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                stats.detector_errors.fetch_add(1, Ordering::Relaxed);
                debug!("detector failed, treating as no hand: {e}");
                None
            }
        };

        let (gesture, vector) = match landmarks {
            Some(ref set) => {
                stats.hands_detected.fetch_add(1, Ordering::Relaxed);
                classify(set, &classifier)
            }
            // No smoothing, no retention: any no-hand frame resets fully.
            None => (Gesture::None, DirectionVector::zero()),
        };
        state.write(gesture, vector);

        if let Some(obs) = observer.as_mut() {
            obs.on_frame(&frame, gesture, vector);
        }

        thread::sleep(frame_period);
    }

    // Dropping the source here releases the camera device.
    drop(source);
    debug!("acquisition loop exited");
}
