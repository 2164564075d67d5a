//! Cross-crate integration scenarios.

pub mod hub_flow;
pub mod server_ws;
