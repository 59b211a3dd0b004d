//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::{generate_connection_id, Connection};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;

/// Floor for the liveness check period
const MIN_HEARTBEAT_CHECK: Duration = Duration::from_millis(50);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection_id = generate_connection_id();
    let heartbeat = state.config().heartbeat.clone();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(state.config().hub.outbound_buffer);

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send Hello before the connection becomes visible to the hub
    let hello = GatewayMessage::hello(&HelloPayload::new(
        heartbeat.interval_ms,
        connection_id.as_str(),
    ));
    match hello.to_json() {
        Ok(json) => {
            if ws_sink.send(Message::Text(json)).await.is_err() {
                tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
                return;
            }
        }
        Err(e) => {
            tracing::error!(connection_id = %connection_id, error = %e, "Failed to encode Hello message");
            return;
        }
    }

    // Register connection
    let connection = state.connect(connection_id.clone(), tx);

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let (close_tx, mut close_rx) = oneshot::channel::<CloseCode>();

    // Spawn task to receive messages from WebSocket
    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text)
                    {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong is handled automatically by axum
                    connection_recv.record_heartbeat();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return None;
                }
            }
        }
        None
    });

    // Spawn task to send messages to WebSocket
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    let json = match msg.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::warn!(connection_id = %connection_id_send, error = %e, "Failed to encode frame");
                            continue;
                        }
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::warn!(
                            connection_id = %connection_id_send,
                            "Failed to send message to WebSocket"
                        );
                        return;
                    }
                }
                code = &mut close_rx => {
                    if let Ok(code) = code {
                        let frame = CloseFrame {
                            code: code.code(),
                            reason: code.reason().into(),
                        };
                        let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    }
                    break;
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    // Spawn heartbeat monitoring task
    let connection_hb = connection.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval((heartbeat.interval() / 2).max(MIN_HEARTBEAT_CHECK));

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat();
            if time_since > heartbeat.timeout() {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::SessionTimeout;
            }
        }
    });

    // Wait for any task to complete
    let (close_code, send_finished) = tokio::select! {
        result = &mut recv_task => (result.ok().flatten(), false),
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            (None, true)
        }
        result = &mut heartbeat_task => (result.ok(), false),
    };
    recv_task.abort();
    heartbeat_task.abort();

    // Leave the hub first so nothing else is queued for this connection
    state.disconnect(&connection_id);

    if let Some(code) = close_code {
        tracing::debug!(connection_id = %connection_id, close_code = %code, "Closing connection");
        let _ = close_tx.send(code);
    } else {
        drop(close_tx);
    }
    if !send_finished {
        let _ = send_task.await;
    }

    tracing::info!(connection_id = %connection_id, "Connection cleaned up");
}

/// Handle a text message from the client
fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    // Parse the message
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    tracing::trace!(
        connection_id = %connection.id(),
        op = %message.op,
        "Received message"
    );

    // Dispatch to handler
    match MessageDispatcher::dispatch(state, connection, message) {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => match e.to_close_code() {
            Some(close_code) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Handler error"
                );
                Err(close_code)
            }
            None => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Frame dropped"
                );
                Ok(())
            }
        },
    }
}
