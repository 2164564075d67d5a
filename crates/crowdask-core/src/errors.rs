//! Store error taxonomy.
//!
//! Only question submission can fail; every other mutation treats an
//! unknown target as an idempotent no-op.

use thiserror::Error;

/// Errors returned by [`SessionStore`](crate::SessionStore) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The target session does not exist (or was removed).
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// Question text was empty or whitespace-only.
    #[error("question text must be a non-empty string")]
    EmptyQuestion,
}
