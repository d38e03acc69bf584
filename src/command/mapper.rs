//! Gesture-to-command mapping
//!
//! Maps a `(Gesture, DirectionVector)` reading onto a typed
//! [`ControlCommand`] using the scaling constants from [`MappingConfig`]:
//!
//! - **Fist** is drive mode: forward/back from vertical hand motion, turn
//!   rate from horizontal hand motion.
//! - **Palm** is look mode: pan from horizontal, tilt from vertical.
//! - **No hand**, or no displacement under an active gesture, maps to
//!   [`ControlCommand::Empty`].
//!
//! The sign inversions (`w_scale`, `pan_scale` negative by default) encode a
//! joystick convention and must be kept as configured, not normalized.

use crate::command::{ControlCommand, DirectionVector, Gesture, LookCommand, MoveCommand};
use crate::config::MappingConfig;

/// Map a classified reading onto a control command
///
/// Integer fields are rounded; `w` stays floating. No clamping is applied
/// beyond the classifier's dead zone, since `vx`/`vy` are already bounded to
/// [-1, 1].
pub fn map_command(
    gesture: Gesture,
    vector: DirectionVector,
    mapping: &MappingConfig,
) -> ControlCommand {
    if vector.is_zero() {
        return ControlCommand::Empty;
    }

    match gesture {
        Gesture::None => ControlCommand::Empty,
        Gesture::Fist => ControlCommand::Move(MoveCommand {
            v: (vector.vy * mapping.v_max).round() as i32,
            w: vector.vx * mapping.w_scale,
        }),
        Gesture::Palm => ControlCommand::Look(LookCommand {
            pan: (vector.vx * mapping.pan_scale).round() as i32,
            tilt: (vector.vy * mapping.tilt_scale).round() as i32,
        }),
    }
}
