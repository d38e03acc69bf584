//! Vision module
//!
//! Frame acquisition and hand interpretation.
//!
//! This module contains:
//! - `frame`: RGB frame buffer and mirror flip
//! - `source`: frame acquisition backends behind the [`FrameSource`] trait
//! - `landmarks`: the 21-point hand model and the external
//!   [`HandDetector`] capability contract
//! - `classifier`: gesture + direction-vector classification
//!
//! The stages are pure transforms; the acquisition runtime in
//! [`pipeline`](crate::pipeline) chains them and owns the mutable state.

pub mod classifier;
pub mod frame;
pub mod landmarks;
pub mod source;

pub use classifier::classify;
pub use frame::{Frame, PixelFormat};
pub use landmarks::{
    landmark_index, HandDetector, HandLandmarkSet, Landmark, NullDetector, LANDMARK_COUNT,
};
pub use source::{FrameSource, StaticFrameSource};

#[cfg(feature = "camera-v4l2")]
pub use source::V4l2FrameSource;
