//! WebSocket handler: one task per client connection.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Once
//! connected, the handler:
//!
//! - **Registers** the connection in the hub's registry and writes the
//!   `previousMessages` batch directly to the socket before draining
//!   the live queue, so the backlog is always first on the wire.
//! - **Forwards** frames queued by the broadcaster (live messages and
//!   voice payloads) to this client.
//! - **Receives** client frames: text frames go through the hub's
//!   ingest/persist/broadcast path, binary frames are relayed as voice.
//!
//! On any exit path the connection is unregistered exactly once; the
//! registry itself tolerates duplicate removal.
//!
//! Known race, kept on purpose: a message persisted while the history
//! scan runs may reach this client both in the batch and live, or in
//! neither. The source protocol has the same ambiguity.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use chathub_core::registry::OutboundFrame;

use crate::state::AppState;

/// Upgrade an HTTP request to a WebSocket connection.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between the connection's outbound
/// queue and incoming WebSocket frames. Each connection runs in its own
/// task, so one connection's slow store append never blocks another's
/// ingestion.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let hub = state.hub;
    let opened = hub.open_connection().await;
    let conn_id = opened.entry.id;
    let mut outbound_rx = opened.live_rx;
    tracing::info!(%conn_id, connections = hub.registry().len(), "client connected");

    // The backlog frame is written before the live queue is touched,
    // so history always precedes live messages on the wire. A failed
    // scan yields no frame and the connection continues without
    // history; new connections never receive past voice payloads
    // either way.
    if let Some(batch) = opened.history_frame {
        if ws_sender.send(Message::Text(batch.into())).await.is_err() {
            hub.registry().unregister(conn_id);
            return;
        }
    }

    loop {
        tokio::select! {
            // --- Branch 1: Drain this connection's outbound queue ---
            frame = outbound_rx.recv() => {
                match frame {
                    Some(OutboundFrame::Text(json)) => {
                        if ws_sender.send(Message::Text(json.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                    }
                    Some(OutboundFrame::Binary(bytes)) => {
                        if ws_sender.send(Message::Binary(bytes.into())).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        // Entry removed from the registry (server shutting down)
                        break;
                    }
                }
            }

            // --- Branch 2: Process frames from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        hub.handle_text(&text).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        hub.relay_voice(bytes.to_vec());
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!(%conn_id, "WebSocket receive error: {err}");
                        break;
                    }
                    // Ping/pong protocol frames (handled by axum/tungstenite)
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.registry().unregister(conn_id);
    tracing::info!(%conn_id, connections = hub.registry().len(), "client disconnected");
}
