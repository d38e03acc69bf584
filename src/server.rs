//! HTTP/WS boundary
//!
//! The outer surface of the runtime, kept deliberately thin: the core only
//! requires "subscribers join the fan-out on connect". Routes:
//!
//! - `GET /` - fixed liveness indicator
//! - `GET /telemetry` - fixed-shape telemetry placeholder (live sensor
//!   values plug in without changing the shape)
//! - `GET /ws` - realtime channel; the connection joins broadcast fan-out
//!   for as long as it is open. Text received from the client is forwarded
//!   to an optional inbound handler and otherwise dropped; the core never
//!   acts on it.
//!
//! CORS is enabled for the configured origins so a browser frontend on a
//! different port can connect.

use crate::broadcast::{Subscriber, SubscriberRegistry};
use crate::config::PilotConfig;
use crate::error::{PilotError, Result};
use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderValue,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

/// Liveness status reported by `GET /`
pub const STATUS_ONLINE: &str = "online";

/// Telemetry placeholder returned by `GET /telemetry`
///
/// No live sensor binding in this core; a real deployment fills these in
/// without changing the shape.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Telemetry {
    pub pan: i32,
    pub tilt: i32,
    pub battery: i32,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            pan: 0,
            tilt: 0,
            battery: 100,
        }
    }
}

/// Shared context handed to every route handler
struct ServerContext {
    registry: Arc<SubscriberRegistry>,
    /// Sink for client-to-server text; `None` drops it after a debug log
    inbound: Option<mpsc::UnboundedSender<String>>,
}

/// Subscriber backed by a per-connection writer queue
///
/// `send` only enqueues; a dedicated writer task drains the queue into the
/// socket, so a slow client stalls its own queue, never the broadcast tick.
struct WsSubscriber {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Subscriber for WsSubscriber {
    async fn send(&self, payload: &str) -> Result<()> {
        self.tx
            .send(payload.to_string())
            .map_err(|_| PilotError::subscriber("connection writer closed"))
    }
}

/// Build the router for the HTTP/WS boundary
pub fn router(
    config: &PilotConfig,
    registry: Arc<SubscriberRegistry>,
    inbound: Option<mpsc::UnboundedSender<String>>,
) -> Router {
    let context = Arc::new(ServerContext { registry, inbound });

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring unparseable CORS origin: {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status))
        .route("/telemetry", get(telemetry))
        .route("/ws", get(ws_upgrade))
        .layer(cors)
        .with_state(context)
}

/// Serve the boundary on the configured address until the task is cancelled
pub async fn serve(
    config: &PilotConfig,
    registry: Arc<SubscriberRegistry>,
    inbound: Option<mpsc::UnboundedSender<String>>,
) -> Result<()> {
    let app = router(config, registry, inbound);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| PilotError::other(format!("server error: {e}")))?;
    Ok(())
}

async fn status() -> impl IntoResponse {
    Json(serde_json::json!({ "status": STATUS_ONLINE }))
}

async fn telemetry() -> impl IntoResponse {
    Json(Telemetry::default())
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(context): State<Arc<ServerContext>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, context))
}

async fn handle_socket(socket: WebSocket, context: Arc<ServerContext>) {
    let (mut sink, mut stream) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let id = context.registry.add(Arc::new(WsSubscriber { tx })).await;
    info!("client connected as {:?}", id);

    // Writer: drain the queue into the socket until either side closes.
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Reader: accept client text but never act on it here.
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match &context.inbound {
                Some(handler) => {
                    if handler.send(text).is_err() {
                        debug!("inbound handler gone, dropping client text");
                    }
                }
                None => debug!("ignoring client text on realtime channel"),
            },
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    // Removing the subscriber drops its queue sender; abort also covers a
    // writer blocked mid-send on a dead peer.
    context.registry.remove(id).await;
    writer.abort();
    info!("client {:?} disconnected", id);
}
