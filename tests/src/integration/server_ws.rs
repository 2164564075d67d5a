//! End-to-end over a real server: axum + WebSocket clients.
//!
//! Boots the full router on an ephemeral port and drives it with
//! `tokio-tungstenite` clients speaking the `{type, data}` protocol.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use crowdask_hub::{Hub, ModeratorAuth};
    use crowdask_server::{build_router, ServerConfig};
    use futures::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use tokio::net::TcpStream;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

    const SECRET: &str = "ws-secret";

    type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn spawn_server() -> (SocketAddr, Arc<Hub>) {
        let hub = Arc::new(Hub::new(ModeratorAuth::new(SECRET)));
        let router = build_router(Arc::clone(&hub), &ServerConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (addr, hub)
    }

    async fn connect(addr: SocketAddr) -> WsClient {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .unwrap();
        ws
    }

    async fn send(ws: &mut WsClient, kind: &str, data: Value) {
        let frame = json!({ "type": kind, "data": data }).to_string();
        ws.send(Message::Text(frame)).await.unwrap();
    }

    async fn next_json(ws: &mut WsClient) -> Value {
        loop {
            let msg = timeout(Duration::from_secs(2), ws.next())
                .await
                .expect("timed out waiting for push")
                .expect("socket closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    /// Reads pushes until an `approved` push with a non-empty list arrives.
    async fn wait_for_approved(ws: &mut WsClient) -> Vec<Value> {
        loop {
            let push = next_json(ws).await;
            if push["type"] == "approved" {
                let list = push["data"].as_array().unwrap().clone();
                if !list.is_empty() {
                    return list;
                }
            }
        }
    }

    /// Reads pushes until a `moderation` push with pending questions arrives.
    async fn wait_for_pending(ws: &mut WsClient) -> Vec<Value> {
        loop {
            let push = next_json(ws).await;
            if push["type"] == "moderation" {
                let pending = push["data"]["pending"].as_array().unwrap().clone();
                if !pending.is_empty() {
                    return pending;
                }
            }
        }
    }

    #[tokio::test]
    async fn full_moderation_flow_over_websocket() {
        let (addr, hub) = spawn_server().await;
        let session = hub.create_session("Demo");

        let mut display = connect(addr).await;
        send(
            &mut display,
            "register-screen",
            json!({ "screen": "display", "session_id": session.id }),
        )
        .await;

        let mut attendee = connect(addr).await;
        send(
            &mut attendee,
            "register-screen",
            json!({ "screen": "submit", "session_id": session.id }),
        )
        .await;
        send(&mut attendee, "submit-question", json!({ "text": "Why?" })).await;

        let mut moderator = connect(addr).await;
        send(
            &mut moderator,
            "register-screen",
            json!({ "screen": "moderation", "session_id": session.id, "token": SECRET }),
        )
        .await;
        let pending = wait_for_pending(&mut moderator).await;
        let id = pending[0]["id"].as_str().unwrap().to_string();

        send(&mut moderator, "approve-question", json!({ "id": id })).await;

        let approved = wait_for_approved(&mut display).await;
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0]["text"], "Why?");
        assert_eq!(approved[0]["likes"], 0);
        assert_eq!(approved[0]["status"], "approved");
    }

    #[tokio::test]
    async fn garbage_frames_do_not_kill_the_connection() {
        let (addr, hub) = spawn_server().await;
        let session = hub.create_session("Demo");

        let mut attendee = connect(addr).await;
        send(
            &mut attendee,
            "register-screen",
            json!({ "screen": "submit", "session_id": session.id }),
        )
        .await;

        attendee
            .send(Message::Text("definitely not json".into()))
            .await
            .unwrap();
        attendee
            .send(Message::Text(r#"{"type":"bogus","data":{}}"#.into()))
            .await
            .unwrap();

        // Connection is still live: a real submit flows through and the
        // resulting (empty) approved push comes back.
        send(&mut attendee, "submit-question", json!({ "text": "still on?" })).await;
        let push = next_json(&mut attendee).await;
        assert_eq!(push["type"], "approved");
    }

    #[tokio::test]
    async fn unauthorized_moderation_command_is_ignored() {
        let (addr, hub) = spawn_server().await;
        let session = hub.create_session("Demo");

        let mut attendee = connect(addr).await;
        send(
            &mut attendee,
            "register-screen",
            json!({ "screen": "submit", "session_id": session.id }),
        )
        .await;
        send(&mut attendee, "submit-question", json!({ "text": "Why?" })).await;

        let mut moderator = connect(addr).await;
        send(
            &mut moderator,
            "register-screen",
            json!({ "screen": "moderation", "session_id": session.id, "token": SECRET }),
        )
        .await;
        let pending = wait_for_pending(&mut moderator).await;
        let id = pending[0]["id"].as_str().unwrap().to_string();

        // The attendee has role `submit` and no moderator grant.
        send(&mut attendee, "approve-question", json!({ "id": id })).await;
        send(&mut attendee, "delete-question", json!({ "id": id })).await;

        // Still pending from the moderator's point of view after a refresh.
        send(
            &mut moderator,
            "register-screen",
            json!({ "screen": "moderation", "session_id": session.id }),
        )
        .await;
        let still_pending = wait_for_pending(&mut moderator).await;
        assert_eq!(still_pending.len(), 1);
    }

    #[tokio::test]
    async fn sessions_do_not_leak_over_websocket() {
        let (addr, hub) = spawn_server().await;
        let a = hub.create_session("A");
        let b = hub.create_session("B");

        let mut in_a = connect(addr).await;
        send(
            &mut in_a,
            "register-screen",
            json!({ "screen": "submit", "session_id": a.id }),
        )
        .await;
        // Registration push for A's partition.
        assert_eq!(next_json(&mut in_a).await["type"], "approved");

        let mut in_b = connect(addr).await;
        send(
            &mut in_b,
            "register-screen",
            json!({ "screen": "display", "session_id": b.id }),
        )
        .await;
        assert_eq!(next_json(&mut in_b).await["type"], "approved");

        send(&mut in_a, "submit-question", json!({ "text": "A only" })).await;
        // A sees its update.
        assert_eq!(next_json(&mut in_a).await["type"], "approved");

        // B must see nothing within the grace window.
        let quiet = timeout(Duration::from_millis(300), in_b.next()).await;
        assert!(quiet.is_err(), "session B received a leaked push");
    }
}
