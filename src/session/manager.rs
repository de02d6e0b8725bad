use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::command::CommandSource;
use crate::session::protocol::ServerMessage;
use crate::state::HomeEngine;

/// Drives a single observer connection from open to close.
///
/// Each session owns its own periodic ticker, so update cadence is
/// per-connection and unsynchronized across observers; all sessions read
/// and mutate the one shared engine.
pub struct Session {
    engine: Arc<HomeEngine>,
    source: Arc<dyn CommandSource>,
    tick_interval: Duration,
}

impl Session {
    pub fn new(
        engine: Arc<HomeEngine>,
        source: Arc<dyn CommandSource>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            engine,
            source,
            tick_interval,
        }
    }

    /// Handle the connection lifecycle.
    pub async fn handle(self, socket: WebSocket) {
        let open = self.engine.connection_opened();
        info!(connections = open, "Observer connected");

        self.run(socket).await;

        let remaining = self.engine.connection_closed();
        info!(connections = remaining, "Observer disconnected");
    }

    /// The ticker lives on this task's stack: every exit path below drops
    /// it, which cancels this connection's periodic schedule.
    async fn run(&self, mut socket: WebSocket) {
        // Exactly one initial-state frame before any update
        let initial = ServerMessage::InitialState {
            data: self.engine.snapshot(),
        };
        if let Err(e) = send(&mut socket, &initial).await {
            error!(error = %e, "Failed to send initial state");
            return;
        }

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; the initial-state
        // frame already covered it
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let update = ServerMessage::StateUpdate { data: self.engine.tick() };
                    if let Err(e) = send(&mut socket, &update).await {
                        // Best-effort fan-out: the mutation stands, this
                        // observer goes away
                        warn!(error = %e, "Failed to send state update");
                        break;
                    }
                }

                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.handle_frame(&mut socket, &text).await {
                                warn!(error = %e, "Failed to reply to command");
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Observer closed connection");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                warn!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Process one inbound text frame.
    ///
    /// Malformed frames get an ERROR reply; anything that reached the
    /// pipeline (applied or dropped) gets a fresh state update. The
    /// periodic ticker keeps running either way.
    async fn handle_frame(&self, socket: &mut WebSocket, text: &str) -> anyhow::Result<()> {
        match self.source.parse(text) {
            Ok(parsed) => {
                let outcome = self.engine.apply(parsed);
                debug!(?outcome, "Command processed");
                let update = ServerMessage::StateUpdate {
                    data: self.engine.snapshot(),
                };
                send(socket, &update).await
            }
            Err(e) => {
                warn!(error = %e, "Malformed command payload");
                let reply = ServerMessage::Error {
                    error: e.to_string(),
                };
                send(socket, &reply).await
            }
        }
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> anyhow::Result<()> {
    let json = serde_json::to_string(message)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}
