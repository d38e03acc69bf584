//! Gesture classification
//!
//! Turns one hand landmark set into a `(Gesture, DirectionVector)` reading:
//!
//! 1. The hand centroid is the midpoint of WRIST and MIDDLE_FINGER_MCP.
//! 2. The centroid maps to a vector centered at the image middle, vertical
//!    axis inverted so "up" in the image is positive (joystick convention).
//! 3. A symmetric per-axis dead zone suppresses jitter around center.
//! 4. Fist vs palm is decided by counting folded fingers: a fingertip whose
//!    planar distance to the wrist falls below the fold threshold counts as
//!    folded; three or more folded fingers is a fist.
//!
//! No-hand frames never reach this module; the pipeline resets state to
//! `(Gesture::None, (0, 0))` directly.

use crate::command::{DirectionVector, Gesture};
use crate::config::ClassifierConfig;
use crate::vision::landmarks::{landmark_index, HandLandmarkSet};

/// Fingertips consulted for the folded-finger count
const FINGERTIPS: [usize; 4] = [
    landmark_index::INDEX_FINGER_TIP,
    landmark_index::MIDDLE_FINGER_TIP,
    landmark_index::RING_FINGER_TIP,
    landmark_index::PINKY_TIP,
];

/// Minimum folded fingers for a fist
const FIST_FOLD_COUNT: usize = 3;

/// Classify one landmark set into a gesture and direction vector
pub fn classify(landmarks: &HandLandmarkSet, config: &ClassifierConfig) -> (Gesture, DirectionVector) {
    let wrist = landmarks.point(landmark_index::WRIST);
    let middle_mcp = landmarks.point(landmark_index::MIDDLE_FINGER_MCP);

    let cx = (wrist.x + middle_mcp.x) / 2.0;
    let cy = (wrist.y + middle_mcp.y) / 2.0;

    // Center is (0.5, 0.5); map to [-1, 1] with inverted vertical axis.
    let mut vx = (cx - 0.5) * 2.0;
    let mut vy = (cy - 0.5) * -2.0;

    if vx.abs() < config.dead_zone {
        vx = 0.0;
    }
    if vy.abs() < config.dead_zone {
        vy = 0.0;
    }

    let folded = FINGERTIPS
        .iter()
        .filter(|&&tip| landmarks.point(tip).planar_distance(&wrist) < config.fold_distance)
        .count();

    let gesture = if folded >= FIST_FOLD_COUNT {
        Gesture::Fist
    } else {
        Gesture::Palm
    };

    (gesture, DirectionVector::new(vx, vy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::landmarks::{Landmark, LANDMARK_COUNT};

    /// Hand at a given centroid with all fingertips at a given planar
    /// distance from the wrist
    fn hand_at(cx: f32, cy: f32, tip_distance: f32) -> HandLandmarkSet {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        // Wrist and middle knuckle coincide so their midpoint is trivial.
        points[landmark_index::WRIST] = Landmark::new(cx, cy, 0.0);
        points[landmark_index::MIDDLE_FINGER_MCP] = Landmark::new(cx, cy, 0.0);
        for &tip in &FINGERTIPS {
            points[tip] = Landmark::new(cx + tip_distance, cy, 0.0);
        }
        HandLandmarkSet::new(points, 1.0)
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn test_centered_hand_is_zero_vector() {
        let (_, vector) = classify(&hand_at(0.5, 0.5, 0.5), &config());
        assert!(vector.is_zero());
    }

    #[test]
    fn test_vector_mapping_and_inverted_y() {
        // Centroid at (1.0, 0.0): far right, top of image.
        let (_, vector) = classify(&hand_at(1.0, 0.0, 0.5), &config());
        assert_eq!(vector.vx, 1.0);
        assert_eq!(vector.vy, 1.0);
    }

    #[test]
    fn test_dead_zone_zeroes_each_axis_independently() {
        // vx = 0.10 (inside the dead zone), vy = 0.5 (outside).
        let (_, vector) = classify(&hand_at(0.55, 0.25, 0.5), &config());
        assert_eq!(vector.vx, 0.0);
        assert!((vector.vy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dead_zone_boundary() {
        // Exactly at the threshold is not suppressed (strictly-below rule).
        // Exactly representable values so the comparison is not at the mercy
        // of rounding: 0.625 maps to vx = 0.25 precisely.
        let config = ClassifierConfig {
            dead_zone: 0.25,
            ..ClassifierConfig::default()
        };
        let (_, vector) = classify(&hand_at(0.625, 0.5, 0.5), &config);
        assert_eq!(vector.vx, 0.25);
    }

    #[test]
    fn test_all_tips_folded_is_fist() {
        let (gesture, _) = classify(&hand_at(0.5, 0.5, 0.05), &config());
        assert_eq!(gesture, Gesture::Fist);
    }

    #[test]
    fn test_no_tips_folded_is_palm() {
        let (gesture, _) = classify(&hand_at(0.5, 0.5, 0.4), &config());
        assert_eq!(gesture, Gesture::Palm);
    }

    #[test]
    fn test_three_folded_is_fist() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[landmark_index::WRIST] = Landmark::new(0.5, 0.5, 0.0);
        points[landmark_index::MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.5, 0.0);
        // Three tips folded, index finger extended.
        points[landmark_index::INDEX_FINGER_TIP] = Landmark::new(0.9, 0.5, 0.0);
        points[landmark_index::MIDDLE_FINGER_TIP] = Landmark::new(0.55, 0.5, 0.0);
        points[landmark_index::RING_FINGER_TIP] = Landmark::new(0.55, 0.5, 0.0);
        points[landmark_index::PINKY_TIP] = Landmark::new(0.55, 0.5, 0.0);
        let (gesture, _) = classify(&HandLandmarkSet::new(points, 1.0), &config());
        assert_eq!(gesture, Gesture::Fist);
    }

    #[test]
    fn test_two_folded_is_palm() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[landmark_index::WRIST] = Landmark::new(0.5, 0.5, 0.0);
        points[landmark_index::MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.5, 0.0);
        points[landmark_index::INDEX_FINGER_TIP] = Landmark::new(0.9, 0.5, 0.0);
        points[landmark_index::MIDDLE_FINGER_TIP] = Landmark::new(0.9, 0.5, 0.0);
        points[landmark_index::RING_FINGER_TIP] = Landmark::new(0.55, 0.5, 0.0);
        points[landmark_index::PINKY_TIP] = Landmark::new(0.55, 0.5, 0.0);
        let (gesture, _) = classify(&HandLandmarkSet::new(points, 1.0), &config());
        assert_eq!(gesture, Gesture::Palm);
    }

    #[test]
    fn test_fold_distance_ignores_z() {
        // Tips planar-close to the wrist but far in depth still count folded.
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[landmark_index::WRIST] = Landmark::new(0.5, 0.5, 0.0);
        points[landmark_index::MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.5, 0.0);
        for &tip in &FINGERTIPS {
            points[tip] = Landmark::new(0.52, 0.5, 5.0);
        }
        let (gesture, _) = classify(&HandLandmarkSet::new(points, 1.0), &config());
        assert_eq!(gesture, Gesture::Fist);
    }
}
