//! Domain entities: questions, sessions, and partition keys.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a question.
///
/// Created as `Pending`, transitions at most once to `Approved`. There is
/// no reverse transition; deletion is allowed from either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Approved,
}

/// An audience question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Opaque id, unique within its session.
    pub id: String,
    /// Submitted text. Immutable after creation.
    pub text: String,
    /// Upvote counter. Mutated only while the question is approved.
    pub likes: u32,
    /// Current lifecycle status.
    pub status: QuestionStatus,
}

impl Question {
    /// Creates a fresh pending question with a generated id.
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            likes: 0,
            status: QuestionStatus::Pending,
        }
    }
}

/// Session id and display name, as listed in the session picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub id: String,
    pub name: String,
}

/// Partition key scoping question collections and broadcasts.
///
/// `Global` is the reserved partition for connections that never register a
/// session id (legacy single-session mode). It is its own partition: it
/// never matches a real session id and a real session id never matches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// The legacy sessionless partition.
    Global,
    /// A real session created through the administrative interface.
    Id(String),
}

impl SessionKey {
    /// Maps an optional wire-level session id onto a partition key.
    pub fn from_wire(session_id: Option<String>) -> Self {
        match session_id {
            Some(id) => SessionKey::Id(id),
            None => SessionKey::Global,
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKey::Global => write!(f, "<global>"),
            SessionKey::Id(id) => write!(f, "{id}"),
        }
    }
}
