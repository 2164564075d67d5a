//! WebSocket transport: frames in, hub pushes out.
//!
//! The reader half feeds raw frames into the hub; a writer task drains the
//! connection's outbound queue. The hub never blocks on a peer: pushes go
//! into the queue and the writer catches up (or the queue dies with the
//! connection).

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::routes::AppState;

/// Upgrades `GET /ws` to a WebSocket session.
pub async fn ws_handler(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let hub = state.hub;
    let (conn_id, mut outbox) = hub.connect();
    info!(connection_id = %conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Writer: drain the hub's pushes into the socket. A failed send means
    // the peer is gone; the reader will observe the close and unregister.
    let writer = tokio::spawn(async move {
        while let Some(push) = outbox.recv().await {
            let text = match push.encode() {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "Failed to encode push");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader: every decodable frame becomes a hub command; everything else
    // is dropped without touching the connection.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => hub.dispatch_raw(conn_id, &text),
            Ok(Message::Binary(data)) => match String::from_utf8(data) {
                Ok(text) => hub.dispatch_raw(conn_id, &text),
                Err(_) => {
                    debug!(connection_id = %conn_id, "Dropping non-UTF-8 binary frame");
                }
            },
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!(connection_id = %conn_id, "WebSocket close received");
                break;
            }
            Err(error) => {
                warn!(connection_id = %conn_id, %error, "WebSocket error");
                break;
            }
        }
    }

    hub.disconnect(conn_id);
    writer.abort();
    info!(connection_id = %conn_id, "WebSocket disconnected");
}
