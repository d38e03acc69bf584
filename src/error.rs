//! Error types for handpilot-core

use std::io;
use thiserror::Error;

/// Result type alias using PilotError
pub type Result<T> = std::result::Result<T, PilotError>;

/// Pilot error types
///
/// All errors that can occur in the gesture-control pipeline. None of them
/// is fatal to the process: the pipeline degrades (no camera, no hand, lost
/// subscriber) rather than crash.
#[derive(Debug, Error)]
pub enum PilotError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Camera device unavailable or read failure
    #[error("Camera error: {0}")]
    Camera(String),

    /// Hand-landmark detector failure
    #[error("Detector error: {0}")]
    Detector(String),

    /// Delivery to a subscriber failed
    #[error("Subscriber error: {0}")]
    Subscriber(String),

    /// Frame buffer does not match the declared dimensions/format
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Runtime is already started
    #[error("Runtime is already running")]
    AlreadyRunning,

    /// Runtime is not started
    #[error("Runtime is not running")]
    NotRunning,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl PilotError {
    /// Create a Camera error
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera(msg.into())
    }

    /// Create a Detector error
    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector(msg.into())
    }

    /// Create a Subscriber error
    pub fn subscriber(msg: impl Into<String>) -> Self {
        Self::Subscriber(msg.into())
    }

    /// Create an InvalidFrame error
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Create an Other error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
