//! Shared control state
//!
//! The single most-recent `(Gesture, DirectionVector)` reading, written by
//! the acquisition thread and read by the broadcast task. The two run in
//! different scheduling domains (a blocking thread vs a tokio task), so the
//! cell is mutex-guarded: a snapshot is always a pair that was written in
//! full, never a gesture from one write paired with a vector from another.
//!
//! Last write wins; there is no queue of intermediate readings because the
//! broadcast side only ever needs the latest one.

use crate::command::{DirectionVector, Gesture};
use std::sync::{Arc, Mutex};

/// One atomically consistent reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub gesture: Gesture,
    pub vector: DirectionVector,
}

impl ControlState {
    /// The no-hand reading
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Shared handle to the control-state cell
///
/// Cheap to clone; all clones refer to the same cell. The cell starts at the
/// no-hand reading and lives until every handle is dropped.
#[derive(Debug, Clone, Default)]
pub struct SharedControlState {
    inner: Arc<Mutex<ControlState>>,
}

impl SharedControlState {
    /// Create a cell initialized to the no-hand reading
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cell with a new reading (last write wins)
    pub fn write(&self, gesture: Gesture, vector: DirectionVector) {
        let mut guard = self.inner.lock().expect("control state lock poisoned");
        *guard = ControlState { gesture, vector };
    }

    /// Reset to the no-hand reading
    pub fn reset(&self) {
        self.write(Gesture::None, DirectionVector::zero());
    }

    /// Read an atomically consistent copy of the current reading
    pub fn snapshot(&self) -> ControlState {
        *self.inner.lock().expect("control state lock poisoned")
    }
}
