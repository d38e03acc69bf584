//! Pipeline configuration
//!
//! Every tuning constant of the vision-to-control pipeline lives here so that
//! deployments and tests can adjust behavior without touching pipeline code:
//! camera selection, acquisition/broadcast cadence, detector confidence
//! thresholds, classification geometry, and command scaling.

use std::net::SocketAddr;
use std::time::Duration;

/// Detector configuration handed to the external hand-landmark capability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Maximum number of hands the detector should track
    pub max_hands: usize,
    /// Minimum confidence for an initial detection to be reported
    pub min_detection_confidence: f32,
    /// Minimum confidence for tracking an already-detected hand
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
        }
    }
}

/// Gesture classification geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Symmetric per-axis dead zone; |v| below this is forced to zero
    pub dead_zone: f32,
    /// Planar fingertip-to-wrist distance below which a finger counts as folded
    pub fold_distance: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.15,
            fold_distance: 0.2,
        }
    }
}

/// Command scaling constants
///
/// The sign conventions here are deliberate policy constants for a specific
/// joystick mental model; they are configuration, not derived values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingConfig {
    /// Linear velocity scale in mm/s (drive mode)
    pub v_max: f32,
    /// Angular velocity scale in rad/s (drive mode)
    pub w_scale: f32,
    /// Pan scale in degrees (look mode)
    pub pan_scale: f32,
    /// Tilt scale in degrees (look mode)
    pub tilt_scale: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            v_max: 500.0,
            w_scale: -2.0,
            pan_scale: -90.0,
            tilt_scale: 45.0,
        }
    }
}

/// Configuration for the full pilot runtime
#[derive(Debug, Clone)]
pub struct PilotConfig {
    /// Camera device index
    pub camera_index: u32,
    /// Target interval between processed frames (~30 Hz)
    pub frame_period: Duration,
    /// Poll interval while no camera is available (degraded idle mode)
    pub idle_poll_period: Duration,
    /// Broadcast tick interval (20 Hz)
    pub broadcast_period: Duration,
    /// Upper bound on a single subscriber send
    pub send_timeout: Duration,
    /// Detector knobs
    pub detector: DetectorConfig,
    /// Classifier geometry
    pub classifier: ClassifierConfig,
    /// Command scaling
    pub mapping: MappingConfig,
    /// Origins allowed by the HTTP/WS boundary
    pub allowed_origins: Vec<String>,
    /// Listen address for the HTTP/WS boundary
    pub bind_addr: SocketAddr,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            frame_period: Duration::from_millis(33),
            idle_poll_period: Duration::from_secs(1),
            broadcast_period: Duration::from_millis(50),
            send_timeout: Duration::from_secs(1),
            detector: DetectorConfig::default(),
            classifier: ClassifierConfig::default(),
            mapping: MappingConfig::default(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            bind_addr: ([0, 0, 0, 0], 8000).into(),
        }
    }
}

impl PilotConfig {
    /// Create a config for a specific camera device
    pub fn with_camera(camera_index: u32) -> Self {
        Self {
            camera_index,
            ..Default::default()
        }
    }

    /// Builder: set the broadcast tick interval
    pub fn with_broadcast_period(mut self, period: Duration) -> Self {
        self.broadcast_period = period;
        self
    }

    /// Builder: set the acquisition frame interval
    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self
    }
}
