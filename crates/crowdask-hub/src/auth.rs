//! Moderator authentication: a single shared secret.
//!
//! Used both for the WebSocket moderator upgrade and for gating the
//! administrative HTTP calls. Comparison is constant-time to avoid leaking
//! the secret through response timing.

use subtle::ConstantTimeEq;

/// Verifier for the shared moderator secret.
#[derive(Clone)]
pub struct ModeratorAuth {
    secret: Option<String>,
}

impl ModeratorAuth {
    /// Authenticates candidates against the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// Rejects every candidate. Used when no secret is configured, so a
    /// misconfigured deployment fails closed rather than open.
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    /// Whether a candidate matches the configured secret.
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.secret {
            Some(secret) => secret
                .as_bytes()
                .ct_eq(candidate.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for ModeratorAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("ModeratorAuth")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}
