//! Broadcast hub: the single serialized dispatch-and-push path.
//!
//! Registration binds a connection to a screen and session; the five
//! mutation commands are each gated by a role or moderator check. Every
//! handled command ends in a full recomputation and re-push of the
//! affected session's derived views. No incremental diffing: question
//! counts are small and simplicity wins over efficiency here.
//!
//! Unauthorized and malformed commands are dropped silently (logged at
//! debug only). Nothing in here is fatal; no command, however malformed,
//! terminates the process or the connection.

use crowdask_core::{QuestionStatus, SessionDescriptor, SessionKey, SessionStore, StoreError};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::auth::ModeratorAuth;
use crate::protocol::{ClientCommand, Role, ServerPush};
use crate::registry::{ConnectionId, ConnectionRegistry};

/// Store and registry behind the hub's single mutation lock.
#[derive(Debug, Default)]
struct HubState {
    store: SessionStore,
    registry: ConnectionRegistry,
}

/// The real-time session hub.
///
/// Owns the session store and connection registry as explicit state with a
/// controlled lifecycle; the transport layer gets an `Arc<Hub>` injected
/// rather than reaching for globals, so tests can run many independent
/// instances.
pub struct Hub {
    state: Mutex<HubState>,
    auth: ModeratorAuth,
}

impl Hub {
    pub fn new(auth: ModeratorAuth) -> Self {
        Self {
            state: Mutex::new(HubState::default()),
            auth,
        }
    }

    /// The moderator secret verifier, shared with the HTTP admin boundary.
    pub fn auth(&self) -> &ModeratorAuth {
        &self.auth
    }

    /// Registers a new connection and hands back its outbound queue.
    ///
    /// The transport's writer drains the receiver; the hub queues pushes on
    /// the sender without ever blocking on the peer.
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerPush>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.state.lock().registry.register(tx);
        (id, rx)
    }

    /// Removes a connection on the transport's close or error signal.
    ///
    /// The only asynchronous event the hub reacts to. Idempotent; no
    /// compensating state rollback is needed since a connection holds no
    /// exclusive resource beyond its registry entry.
    pub fn disconnect(&self, id: ConnectionId) {
        self.state.lock().registry.unregister(id);
    }

    /// Decodes and dispatches a raw inbound frame.
    ///
    /// Undecodable payloads take the malformed-message path: logged and
    /// ignored, connection stays open.
    pub fn dispatch_raw(&self, conn: ConnectionId, text: &str) {
        match ClientCommand::decode(text) {
            Ok(command) => self.dispatch(conn, command),
            Err(error) => {
                debug!(connection_id = %conn, %error, "Dropping malformed message");
            }
        }
    }

    /// Applies one client command: gate, mutate, recompute, fan out.
    ///
    /// Runs to completion under the hub lock, so command handling is
    /// serialized through a single mutation path (no finer locking needed
    /// on the store or registry).
    pub fn dispatch(&self, conn: ConnectionId, command: ClientCommand) {
        let mut state = self.state.lock();

        let Some(meta) = state.registry.meta(conn) else {
            debug!(connection_id = %conn, "Dropping command from unknown connection");
            return;
        };
        let role = meta.role;
        let is_moderator = meta.is_moderator;
        let session = meta.session.clone();

        match command {
            ClientCommand::RegisterScreen {
                screen,
                session_id,
                token,
            } => {
                let session = SessionKey::from_wire(session_id);
                let grant = token.as_deref().is_some_and(|t| self.auth.verify(t));
                state.registry.bind(conn, screen, session.clone(), grant);
                push_views(&state, &session);
            }

            ClientCommand::SubmitQuestion { text, .. } => {
                if role != Some(Role::Submit) {
                    debug!(connection_id = %conn, ?role, "Dropping submit from non-submit role");
                    return;
                }
                match state.store.add_question(&session, &text) {
                    Ok(_) => push_views(&state, &session),
                    // Unknown target is a no-op, not a precondition failure:
                    // the views are still re-pushed (and come up empty).
                    Err(StoreError::UnknownSession(_)) => push_views(&state, &session),
                    Err(error @ StoreError::EmptyQuestion) => {
                        debug!(connection_id = %conn, %error, "Dropping rejected submission");
                    }
                }
            }

            ClientCommand::LikeQuestion { id, .. } => {
                if role != Some(Role::Submit) {
                    debug!(connection_id = %conn, ?role, "Dropping like from non-submit role");
                    return;
                }
                state.store.like(&session, &id);
                push_views(&state, &session);
            }

            ClientCommand::UnlikeQuestion { id, .. } => {
                if role != Some(Role::Submit) {
                    debug!(connection_id = %conn, ?role, "Dropping unlike from non-submit role");
                    return;
                }
                state.store.unlike(&session, &id);
                push_views(&state, &session);
            }

            ClientCommand::ApproveQuestion { id, .. } => {
                if !is_moderator {
                    debug!(connection_id = %conn, "Dropping approve from non-moderator");
                    return;
                }
                state.store.approve(&session, &id);
                push_views(&state, &session);
            }

            ClientCommand::DeleteQuestion { id, .. } => {
                if !is_moderator {
                    debug!(connection_id = %conn, "Dropping delete from non-moderator");
                    return;
                }
                state.store.delete(&session, &id);
                push_views(&state, &session);
            }
        }
    }

    // Administrative collaborator interface, driven by the HTTP boundary.

    /// Creates a session. Never fails.
    pub fn create_session(&self, name: &str) -> SessionDescriptor {
        self.state.lock().store.create_session(name)
    }

    /// Removes a session and discards its questions. Connections still
    /// bound to it are not force-disconnected; their view computations
    /// simply come up empty from now on.
    pub fn remove_session(&self, id: &str) {
        self.state.lock().store.remove_session(id);
    }

    /// Lists sessions for the picker.
    pub fn sessions(&self) -> Vec<SessionDescriptor> {
        self.state.lock().store.sessions()
    }
}

/// Recomputes both derived views for one partition and fans them out.
///
/// `approved` goes to submit and display screens, `moderation` to
/// moderation screens — always within the exact same partition. The global
/// partition and real session ids never cross.
fn push_views(state: &HubState, session: &SessionKey) {
    let approved = state.store.questions(session, Some(QuestionStatus::Approved));
    let pending = state.store.questions(session, Some(QuestionStatus::Pending));

    state.registry.send_where(
        |meta| {
            meta.session == *session
                && matches!(meta.role, Some(Role::Submit) | Some(Role::Display))
        },
        &ServerPush::Approved(approved.clone()),
    );
    state.registry.send_where(
        |meta| meta.session == *session && meta.role == Some(Role::Moderation),
        &ServerPush::Moderation { approved, pending },
    );
}
