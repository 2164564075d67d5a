//! Crowdask Hub - the real-time core of the Q&A system.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       BROADCAST HUB                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  inbound command            ┌──────────────────────┐         │
//! │  ───────────────→ dispatch ─┤  Mutex<HubState>     │         │
//! │                             │  ├─ SessionStore     │         │
//! │                             │  └─ ConnectionRegistry│        │
//! │                             └──────────┬───────────┘         │
//! │                                        │ recompute views     │
//! │              ┌─────────────────────────┼──────────────────┐  │
//! │              ▼                         ▼                  ▼  │
//! │      submit outboxes           display outboxes   moderation │
//! │      (same session)            (same session)     outboxes   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every inbound command is processed to completion under one lock:
//! store mutation, view recomputation, and the fan-out for that command.
//! Fan-out writes into per-connection unbounded channels, so a slow or
//! closed peer never stalls another connection's commands.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod auth;
pub mod hub;
pub mod protocol;
pub mod registry;

pub use auth::ModeratorAuth;
pub use hub::Hub;
pub use protocol::{ClientCommand, Role, ServerPush};
pub use registry::{ConnectionId, ConnectionRegistry};
