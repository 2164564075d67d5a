//! Wire protocol: tagged `{type, data}` envelopes.
//!
//! Inbound commands and outbound pushes are discriminated unions validated
//! at the boundary. Anything that does not decode is the malformed-message
//! path: dropped and logged, never an error reply and never a disconnect.

use crowdask_core::Question;
use serde::{Deserialize, Serialize};

/// Screen role a connection registers as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Attendee phone: submits and likes questions.
    Submit,
    /// Public projector: shows the approved, rank-ordered list.
    Display,
    /// Moderator console: sees pending and approved lists.
    Moderation,
}

/// Commands a client may send over its connection.
///
/// Mutation payloads carry an optional `session_id` for wire compatibility
/// with the clients, but the hub scopes every mutation to the session the
/// connection registered with; only `register-screen` reads the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientCommand {
    /// Binds the connection's role and session; an optional token upgrades
    /// it to moderator (one-way, never reverted by later registrations).
    #[serde(rename = "register-screen")]
    RegisterScreen {
        screen: Role,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    #[serde(rename = "submit-question")]
    SubmitQuestion {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    #[serde(rename = "like-question")]
    LikeQuestion {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    #[serde(rename = "unlike-question")]
    UnlikeQuestion {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    #[serde(rename = "approve-question")]
    ApproveQuestion {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    #[serde(rename = "delete-question")]
    DeleteQuestion {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
}

impl ClientCommand {
    /// Decodes a raw inbound frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Pushes the hub sends to clients after each command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerPush {
    /// The approved list, for submit and display screens. Insertion order;
    /// ranking by likes is applied by the recipient.
    #[serde(rename = "approved")]
    Approved(Vec<Question>),

    /// Both lists, for moderation screens.
    #[serde(rename = "moderation")]
    Moderation {
        approved: Vec<Question>,
        pending: Vec<Question>,
    },
}

impl ServerPush {
    /// Serializes for transmission.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
