//! Administrative HTTP routes: session management and authentication.
//!
//! These are request/response glue around the hub; the real-time work all
//! happens on the WebSocket side. Error surfacing to end users is limited
//! to this boundary (rejected session creation, failed authentication).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use crowdask_hub::Hub;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::ws::ws_handler;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
}

/// Builds the full router: WebSocket endpoint, admin routes, and the
/// optional static SPA with index fallback.
pub fn build_router(hub: Arc<Hub>, config: &ServerConfig) -> Router {
    let state = AppState { hub };

    let mut router = Router::new()
        .route("/ws", get(ws_handler))
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/:id", axum::routing::delete(delete_session))
        .route("/authentificate", axum::routing::post(authenticate))
        .with_state(state);

    if let Some(dir) = &config.static_dir {
        info!(dir = %dir.display(), "Serving static frontend");
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    session_name: Option<String>,
    token: Option<String>,
}

async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Response {
    // A supplied token must pass; session creation itself is open, so an
    // absent token is allowed.
    if let Some(token) = &body.token {
        if !state.hub.auth().verify(token) {
            return unauthorized();
        }
    }
    let Some(name) = body.session_name.filter(|n| !n.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Session name is required" })),
        )
            .into_response();
    };
    let descriptor = state.hub.create_session(&name);
    info!(session_id = %descriptor.id, name = %descriptor.name, "Session created");
    Json(descriptor).into_response()
}

#[derive(Debug, Deserialize, Default)]
struct TokenRequest {
    token: Option<String>,
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<TokenRequest>>,
) -> Response {
    let token = body.and_then(|Json(b)| b.token);
    if let Some(token) = &token {
        if !state.hub.auth().verify(token) {
            return unauthorized();
        }
    }
    state.hub.remove_session(&id);
    info!(session_id = %id, "Session removed");
    Json(json!({ "success": true })).into_response()
}

async fn list_sessions(State(state): State<AppState>) -> Response {
    Json(state.hub.sessions()).into_response()
}

#[derive(Debug, Deserialize, Default)]
struct AuthRequest {
    password: Option<String>,
}

async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Response {
    match body.password {
        Some(password) if state.hub.auth().verify(&password) => {
            Json(json!({ "success": true })).into_response()
        }
        _ => (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "error": "Unauthorized" })),
        )
            .into_response(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}
