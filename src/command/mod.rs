//! Control command model
//!
//! Typed command types and their wire representation.
//!
//! This module contains:
//! - [`Gesture`]: discrete hand-pose classification
//! - [`DirectionVector`]: normalized 2D hand displacement
//! - [`ControlCommand`]: validated tagged union (`Move` | `Look` | `Empty`)
//! - [`ControlMessage`]: the JSON wire shape pushed to subscribers
//!
//! ## Wire format
//!
//! ```json
//! {"type": "control", "move": {"v": 250, "w": -2.0}, "look": null}
//! ```
//!
//! Exactly one of `move`/`look` is non-null whenever a message is sent at
//! all; an [`ControlCommand::Empty`] command has no wire representation and
//! is never broadcast.

pub mod mapper;

pub use mapper::map_command;

use serde::{Deserialize, Serialize};

/// Discrete hand-pose classification
///
/// `None` means no hand is currently detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// No hand detected this frame
    #[default]
    None,
    /// Closed hand: drive mode
    Fist,
    /// Open hand: look mode
    Palm,
}

/// Normalized 2D hand displacement from image center
///
/// Both components are in [-1, 1] after dead-zone suppression. Positive `vy`
/// is "up" in the image, matching joystick convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionVector {
    /// Horizontal displacement: -1 (left) to 1 (right)
    pub vx: f32,
    /// Vertical displacement: -1 (down) to 1 (up)
    pub vy: f32,
}

impl DirectionVector {
    /// Create a direction vector
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both axes are exactly zero
    pub fn is_zero(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0
    }
}

/// Drive command: linear velocity + angular velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Linear velocity in mm/s
    pub v: i32,
    /// Angular velocity in rad/s
    pub w: f32,
}

/// Look command: camera/head orientation angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookCommand {
    /// Pan angle in degrees
    pub pan: i32,
    /// Tilt angle in degrees
    pub tilt: i32,
}

/// A validated control command
///
/// At most one of drive/look is populated; `Empty` is produced when there is
/// no hand or no displacement, and is never placed on the broadcast channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// Drive the device (fist gesture)
    Move(MoveCommand),
    /// Aim the camera/head (palm gesture)
    Look(LookCommand),
    /// Nothing to do this tick
    Empty,
}

impl ControlCommand {
    /// Whether this command carries no payload
    pub fn is_empty(&self) -> bool {
        matches!(self, ControlCommand::Empty)
    }

    /// Convert to the wire message, or `None` for an empty command
    pub fn to_message(&self) -> Option<ControlMessage> {
        match *self {
            ControlCommand::Move(mv) => Some(ControlMessage {
                kind: "control",
                mv: Some(mv),
                look: None,
            }),
            ControlCommand::Look(look) => Some(ControlMessage {
                kind: "control",
                mv: None,
                look: Some(look),
            }),
            ControlCommand::Empty => None,
        }
    }
}

/// The JSON object pushed to each subscriber
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlMessage {
    /// Message discriminator, always `"control"`
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Drive payload, or null
    #[serde(rename = "move")]
    pub mv: Option<MoveCommand>,

    /// Look payload, or null
    pub look: Option<LookCommand>,
}
