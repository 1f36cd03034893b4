//! Per-session mutable authentication state.
//!
//! Each connection owns exactly one [`SessionAuthState`]. It is mutated only
//! by the authentication policy and the interactive-challenge path of that
//! session, and it is never shared across sessions: running multiple sessions
//! concurrently means one fully isolated engine instance per session.

use uuid::Uuid;

use super::auth::factors::FactorTracker;

/// Mutable authentication state owned by a single session.
///
/// Verification flags are monotonic: once a factor verifies it stays
/// verified for the remainder of the session. There is deliberately no way
/// to reset the [`FactorTracker`] short of dropping the whole state.
#[derive(Debug)]
pub struct SessionAuthState {
    /// Session identifier for log correlation.
    session_id: Uuid,
    /// Multi-factor verification progress for this session.
    pub factors: FactorTracker,
    /// Identity that a keyboard-interactive challenge was issued to, if any.
    pub pending_challenge: Option<String>,
}

impl SessionAuthState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            factors: FactorTracker::new(),
            pending_challenge: None,
        }
    }

    /// Session identifier included in log lines for correlation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Default for SessionAuthState {
    fn default() -> Self {
        Self::new()
    }
}
