//! Connection registry: live connection → role/session metadata.
//!
//! The registry never owns the transport's lifecycle. It holds each
//! connection's outbound channel sender and reacts to the transport's
//! close signal via [`ConnectionRegistry::unregister`]; a send into a
//! channel whose receiver is gone is simply skipped.

use std::collections::HashMap;

use crowdask_core::SessionKey;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::protocol::{Role, ServerPush};

/// Unique identifier for a live connection.
pub type ConnectionId = Uuid;

/// Per-connection metadata.
#[derive(Debug)]
pub struct ConnMeta {
    /// Screen role. `None` until the client registers; re-settable on
    /// re-registration.
    pub role: Option<Role>,
    /// Moderator flag. Only ever transitions false → true.
    pub is_moderator: bool,
    /// Broadcast partition this connection is scoped to.
    pub session: SessionKey,
    /// Fire-and-forget outbound queue drained by the transport's writer.
    outbox: mpsc::UnboundedSender<ServerPush>,
}

/// Authoritative map of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnMeta>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a connection with default metadata: no role, not a
    /// moderator, scoped to the global partition.
    pub fn register(&mut self, outbox: mpsc::UnboundedSender<ServerPush>) -> ConnectionId {
        let id = Uuid::new_v4();
        self.connections.insert(
            id,
            ConnMeta {
                role: None,
                is_moderator: false,
                session: SessionKey::Global,
                outbox,
            },
        );
        debug!(connection_id = %id, "Registered connection");
        id
    }

    /// Re-binds a connection's role and session from a registration
    /// command. The moderator flag is sticky: once granted it survives any
    /// later re-registration.
    pub fn bind(
        &mut self,
        id: ConnectionId,
        role: Role,
        session: SessionKey,
        grant_moderator: bool,
    ) -> bool {
        let Some(meta) = self.connections.get_mut(&id) else {
            return false;
        };
        meta.role = Some(role);
        meta.session = session;
        meta.is_moderator |= grant_moderator;
        debug!(
            connection_id = %id,
            role = ?role,
            session = %meta.session,
            is_moderator = meta.is_moderator,
            "Bound connection"
        );
        true
    }

    /// Removes a connection on disconnect. Safe to call more than once.
    pub fn unregister(&mut self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            debug!(connection_id = %id, "Unregistered connection");
        }
    }

    /// Metadata for one connection.
    pub fn meta(&self, id: ConnectionId) -> Option<&ConnMeta> {
        self.connections.get(&id)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Sends a push to every live connection matching the predicate.
    ///
    /// Connections whose transport already went away are skipped, not
    /// treated as errors; they get pruned when the transport reports close.
    /// Returns the number of queued sends.
    pub fn send_where<P>(&self, predicate: P, push: &ServerPush) -> usize
    where
        P: Fn(&ConnMeta) -> bool,
    {
        let mut sent = 0;
        for meta in self.connections.values() {
            if meta.outbox.is_closed() || !predicate(meta) {
                continue;
            }
            if meta.outbox.send(push.clone()).is_ok() {
                sent += 1;
            }
        }
        sent
    }
}
