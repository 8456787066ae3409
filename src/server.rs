//! WebSocket transport in front of the coordinator.

use crate::coordinator::Coordinator;
use crate::protocol::{ClientEvent, ServerEvent};
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Shared state behind the router.
#[derive(Debug, Clone)]
pub struct AppState {
    coordinator: Coordinator,
    next_conn: Arc<AtomicU64>,
}

impl AppState {
    /// Wraps a coordinator for serving.
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator,
            next_conn: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Builds the service router: the WebSocket endpoint plus a liveness probe.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Binds `host:port` and serves until the process stops.
pub async fn serve(host: &str, port: u16, coordinator: Coordinator) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "match server listening");
    axum::serve(listener, router(AppState::new(coordinator))).await?;
    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Per-connection loop: forwards queued events out, routes frames in.
///
/// The unbounded queue keeps broadcasts fire-and-forget for the
/// coordinator; only this task ever touches the socket.
#[instrument(skip(state, socket))]
async fn handle_socket(state: AppState, mut socket: WebSocket) {
    let conn = state.next_conn.fetch_add(1, Ordering::Relaxed);
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    debug!(conn, "socket open");

    loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(conn, %err, "outbound event not encodable"),
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => state.coordinator.handle(conn, &tx, event).await,
                            Err(err) => debug!(conn, %err, "unparseable frame ignored"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(conn, %err, "socket error");
                        break;
                    }
                }
            }
        }
    }

    state.coordinator.disconnect(conn).await;
    debug!(conn, "socket closed");
}
