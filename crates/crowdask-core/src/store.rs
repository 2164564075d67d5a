//! In-memory session store.
//!
//! Owns every session's question collection plus the reserved global
//! partition. All methods take `&mut self`; the caller (the hub) provides
//! the serialization, so no internal locking is needed here.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::entities::{Question, QuestionStatus, SessionDescriptor, SessionKey};
use crate::errors::StoreError;

/// Questions and metadata for one administratively created session.
#[derive(Debug, Default)]
struct SessionRecord {
    name: String,
    questions: Vec<Question>,
}

/// Authoritative store of sessions and their questions.
///
/// Question collections keep insertion order; ranking by likes is a
/// presentation concern of the display consumer, not the store's.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// The legacy sessionless partition. Always exists.
    global: Vec<Question>,
    /// Real sessions keyed by id.
    sessions: HashMap<String, SessionRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a fresh unique id. Never fails.
    pub fn create_session(&mut self, name: impl Into<String>) -> SessionDescriptor {
        let id = Uuid::new_v4().to_string();
        let name = name.into();
        self.sessions.insert(
            id.clone(),
            SessionRecord {
                name: name.clone(),
                questions: Vec::new(),
            },
        );
        debug!(session_id = %id, name = %name, "Created session");
        SessionDescriptor { id, name }
    }

    /// Removes a session and discards its questions. No-op when unknown.
    pub fn remove_session(&mut self, id: &str) {
        if self.sessions.remove(id).is_some() {
            debug!(session_id = %id, "Removed session");
        }
    }

    /// All sessions, for the session picker. Order is not significant.
    pub fn sessions(&self) -> Vec<SessionDescriptor> {
        self.sessions
            .iter()
            .map(|(id, record)| SessionDescriptor {
                id: id.clone(),
                name: record.name.clone(),
            })
            .collect()
    }

    /// Adds a pending question to a partition.
    ///
    /// The global partition always accepts submissions; a real session must
    /// exist. Empty or whitespace-only text is rejected.
    pub fn add_question(
        &mut self,
        key: &SessionKey,
        text: &str,
    ) -> Result<Question, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyQuestion);
        }
        let questions = self
            .questions_mut(key)
            .ok_or_else(|| StoreError::UnknownSession(key.to_string()))?;
        let question = Question::new(text);
        questions.push(question.clone());
        debug!(session = %key, question_id = %question.id, "Added question");
        Ok(question)
    }

    /// Questions in a partition, insertion-ordered, optionally filtered by
    /// status. An unknown (or removed) session yields an empty list.
    pub fn questions(
        &self,
        key: &SessionKey,
        status: Option<QuestionStatus>,
    ) -> Vec<Question> {
        self.questions_ref(key)
            .map(|questions| {
                questions
                    .iter()
                    .filter(|q| status.is_none_or(|s| q.status == s))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Increments a question's like counter.
    ///
    /// Only approved questions accumulate likes; anything else is a no-op.
    /// Returns whether the counter changed.
    pub fn like(&mut self, key: &SessionKey, id: &str) -> bool {
        let Some(q) = self.find_mut(key, id) else {
            return false;
        };
        if q.status != QuestionStatus::Approved {
            return false;
        }
        q.likes += 1;
        debug!(session = %key, question_id = %id, likes = q.likes, "Liked question");
        true
    }

    /// Decrements a question's like counter, clamped at zero.
    ///
    /// Same gating as [`like`](Self::like): approved questions only.
    pub fn unlike(&mut self, key: &SessionKey, id: &str) -> bool {
        let Some(q) = self.find_mut(key, id) else {
            return false;
        };
        if q.status != QuestionStatus::Approved || q.likes == 0 {
            return false;
        }
        q.likes -= 1;
        debug!(session = %key, question_id = %id, likes = q.likes, "Unliked question");
        true
    }

    /// Transitions a question from pending to approved.
    ///
    /// Idempotent: approving an already-approved or unknown question has no
    /// observable effect.
    pub fn approve(&mut self, key: &SessionKey, id: &str) -> bool {
        let Some(q) = self.find_mut(key, id) else {
            return false;
        };
        if q.status != QuestionStatus::Pending {
            return false;
        }
        q.status = QuestionStatus::Approved;
        debug!(session = %key, question_id = %id, "Approved question");
        true
    }

    /// Removes a question regardless of status. No-op when unknown.
    pub fn delete(&mut self, key: &SessionKey, id: &str) -> bool {
        let Some(questions) = self.questions_mut(key) else {
            return false;
        };
        let before = questions.len();
        questions.retain(|q| q.id != id);
        let deleted = questions.len() < before;
        if deleted {
            debug!(session = %key, question_id = %id, "Deleted question");
        }
        deleted
    }

    fn questions_ref(&self, key: &SessionKey) -> Option<&Vec<Question>> {
        match key {
            SessionKey::Global => Some(&self.global),
            SessionKey::Id(id) => self.sessions.get(id).map(|r| &r.questions),
        }
    }

    fn questions_mut(&mut self, key: &SessionKey) -> Option<&mut Vec<Question>> {
        match key {
            SessionKey::Global => Some(&mut self.global),
            SessionKey::Id(id) => self.sessions.get_mut(id).map(|r| &mut r.questions),
        }
    }

    fn find_mut(&mut self, key: &SessionKey, id: &str) -> Option<&mut Question> {
        self.questions_mut(key)?.iter_mut().find(|q| q.id == id)
    }
}
