//! Crowdask Server - transport adapter for the Q&A hub.
//!
//! Wires the broadcast hub (`crowdask-hub`) to the outside world:
//!
//! - `GET /ws` — the real-time WebSocket protocol
//! - `POST /sessions`, `DELETE /sessions/:id`, `GET /sessions` — session
//!   administration
//! - `POST /authentificate` — moderator password check for the frontend
//! - static SPA serving with index fallback
//!
//! All routing is simple request/response glue; the concurrency and
//! consistency concerns live in the hub.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod routes;
pub mod ws;

pub use config::{ConfigError, ServerConfig};
pub use routes::{build_router, AppState};
