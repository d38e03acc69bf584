//! Hand landmark model and detector contract
//!
//! The landmark detector itself is an external capability: given an RGB
//! frame, it returns zero or one sets of 21 normalized 3D landmarks. This
//! module defines the data it produces and the trait a backend implements;
//! the pipeline never reimplements detection.

use crate::error::Result;
use crate::vision::frame::Frame;

/// Number of landmarks in a hand set
pub const LANDMARK_COUNT: usize = 21;

/// Named landmark indices
///
/// Only the entries the classifier consumes are listed; the set still carries
/// all 21 points so richer backends plug in unchanged.
pub mod landmark_index {
    /// Wrist
    pub const WRIST: usize = 0;
    /// Index fingertip
    pub const INDEX_FINGER_TIP: usize = 8;
    /// Middle-finger knuckle (MCP joint)
    pub const MIDDLE_FINGER_MCP: usize = 9;
    /// Middle fingertip
    pub const MIDDLE_FINGER_TIP: usize = 12;
    /// Ring fingertip
    pub const RING_FINGER_TIP: usize = 16;
    /// Pinky fingertip
    pub const PINKY_TIP: usize = 20;
}

/// One landmark in normalized [0, 1] image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    /// Create a landmark
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) Euclidean distance to another landmark, z ignored
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered set of 21 hand landmarks with the detector's confidence
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
    confidence: f32,
}

impl HandLandmarkSet {
    /// Create a landmark set
    pub fn new(points: [Landmark; LANDMARK_COUNT], confidence: f32) -> Self {
        Self { points, confidence }
    }

    /// Landmark at a named index
    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// Detection confidence reported by the backend
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// All 21 points
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

/// External hand-landmark detection capability
///
/// Backends wrap whatever inference engine is available. The contract:
/// zero or one landmark sets per frame (multi-hand backends yield only the
/// first), configured with the knobs in
/// [`DetectorConfig`](crate::config::DetectorConfig). A returned `Err` is
/// treated by the pipeline as "no hand detected this frame", never as fatal.
pub trait HandDetector: Send {
    /// Detect a hand in one RGB frame
    fn detect(&mut self, frame: &Frame) -> Result<Option<HandLandmarkSet>>;
}

/// Detector that never reports a hand
///
/// Stands in where no inference backend is wired up; downstream state settles
/// to the no-hand reading.
#[derive(Debug, Default)]
pub struct NullDetector;

impl HandDetector for NullDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Option<HandLandmarkSet>> {
        Ok(None)
    }
}
