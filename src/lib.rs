//! handpilot-core
//!
//! Hand-gesture teleoperation core: turns a live camera feed of a human hand
//! into real-time motion/look commands for a remotely operated device,
//! broadcast over a persistent connection to any number of subscribed
//! clients.
//!
//! ## Architecture
//!
//! Two independent execution contexts run for the lifetime of the process:
//!
//! ```text
//! camera -> detector -> classifier -> shared state     (blocking thread)
//! shared state -> mapper -> subscriber fan-out         (tokio task, 20 Hz)
//! ```
//!
//! ### Modules
//!
//! - `vision`: frame acquisition, the external hand-landmark detector
//!   contract, gesture classification
//! - `command`: typed control commands, gesture-to-command mapping, wire
//!   format
//! - `state`: the mutex-guarded shared control-state cell
//! - `pipeline`: the acquisition thread
//! - `broadcast`: subscriber registry and broadcast scheduler
//! - `runtime`: the runtime context object tying both sides together
//! - `server`: Axum HTTP/WS boundary (status, telemetry, realtime channel)
//!
//! ## Example
//!
//! ```rust,no_run
//! use handpilot_core::config::PilotConfig;
//! use handpilot_core::runtime::PilotRuntime;
//! use handpilot_core::vision::NullDetector;
//!
//! # async fn example() -> handpilot_core::error::Result<()> {
//! let mut runtime = PilotRuntime::new(PilotConfig::default());
//!
//! // Wire a real frame source and detector backend here; with neither, the
//! // runtime idles in degraded mode and broadcasts nothing.
//! runtime.start(None, Box::new(NullDetector), None)?;
//!
//! handpilot_core::server::serve(runtime.config(), runtime.registry(), None).await?;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use command::{ControlCommand, DirectionVector, Gesture};
pub use error::{PilotError, Result};
pub use runtime::PilotRuntime;

// Public modules
pub mod broadcast;
pub mod command;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod server;
pub mod state;
pub mod vision;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
