//! handpilotd
//!
//! Daemon wiring for the gesture-control runtime: starts the acquisition
//! and broadcast contexts, serves the HTTP/WS boundary, and shuts both down
//! on Ctrl-C.
//!
//! Without the `camera-v4l2` feature (or when the camera cannot be opened)
//! the runtime runs in degraded idle mode: the boundary stays up, clients
//! can connect, and no commands are broadcast. The hand-landmark detector is
//! an external capability; this binary wires the null backend, so a real
//! deployment embeds the library and supplies its own.

use handpilot_core::config::PilotConfig;
use handpilot_core::runtime::PilotRuntime;
use handpilot_core::vision::{FrameSource, NullDetector};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Capture resolution requested from the camera
#[cfg(feature = "camera-v4l2")]
const CAPTURE_WIDTH: u32 = 640;
#[cfg(feature = "camera-v4l2")]
const CAPTURE_HEIGHT: u32 = 480;

fn open_camera(config: &PilotConfig) -> Option<Box<dyn FrameSource>> {
    #[cfg(feature = "camera-v4l2")]
    {
        use handpilot_core::vision::V4l2FrameSource;
        match V4l2FrameSource::open(config.camera_index, CAPTURE_WIDTH, CAPTURE_HEIGHT) {
            Ok(source) => return Some(Box::new(source)),
            Err(e) => {
                warn!("could not open camera {}: {e}", config.camera_index);
                return None;
            }
        }
    }
    #[cfg(not(feature = "camera-v4l2"))]
    {
        warn!(
            "built without a camera backend, device {} not opened",
            config.camera_index
        );
        None
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("handpilotd {} starting", handpilot_core::VERSION);

    let config = PilotConfig::default();
    let source = open_camera(&config);

    let mut runtime = PilotRuntime::new(config);
    if let Err(e) = runtime.start(source, Box::new(NullDetector), None) {
        error!("failed to start runtime: {e}");
        return;
    }

    let server_config = runtime.config().clone();
    let registry = runtime.registry();
    let server = tokio::spawn(async move {
        if let Err(e) = handpilot_core::server::serve(&server_config, registry, None).await {
            error!("server stopped: {e}");
        }
    });

    if tokio::signal::ctrl_c().await.is_err() {
        error!("failed to listen for shutdown signal");
    }

    info!("shutting down");
    server.abort();
    let stats = runtime.stats();
    if let Err(e) = runtime.stop().await {
        warn!("shutdown: {e}");
    }

    info!(
        "final stats: frames={}, hands={}, ticks={}, commands={}",
        stats.acquisition.frames_read,
        stats.acquisition.hands_detected,
        stats.broadcast.ticks,
        stats.broadcast.commands_sent
    );
}
