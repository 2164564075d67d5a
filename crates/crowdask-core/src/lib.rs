//! Crowdask Core - Session store and question lifecycle.
//!
//! This crate owns the per-session question collections and the state
//! machine governing a single question. It has no networking and no async:
//! the broadcast layer (`crowdask-hub`) drives it through plain method
//! calls from a single serialized mutation path.
//!
//! # Question lifecycle
//!
//! ```text
//! submit ──→ Pending ──approve──→ Approved
//!               │                     │
//!               └───── delete ────────┘
//! ```
//!
//! Likes are only counted while a question is `Approved`, and the counter
//! never goes below zero. Every mutation whose target does not exist is a
//! no-op rather than an error, so retries are harmless.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod entities;
pub mod errors;
pub mod store;

pub use entities::{Question, QuestionStatus, SessionDescriptor, SessionKey};
pub use errors::StoreError;
pub use store::SessionStore;
