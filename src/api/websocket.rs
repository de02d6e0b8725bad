use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::command::CommandSource;
use crate::session::Session;
use crate::state::HomeEngine;

/// Shared application state for the WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub engine: Arc<HomeEngine>,
    pub source: Arc<dyn CommandSource>,
    pub tick_interval: Duration,
}

/// GET /ws - WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WsAppState>>,
) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Create the WebSocket router
pub fn create_ws_router(state: Arc<WsAppState>) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

/// Hand the upgraded socket to a session for its connection lifetime
async fn handle_socket(socket: WebSocket, state: Arc<WsAppState>) {
    Session::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.source),
        state.tick_interval,
    )
    .handle(socket)
    .await;
}
