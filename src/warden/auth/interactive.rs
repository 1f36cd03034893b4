//! Keyboard-interactive challenge exchange.
//!
//! The exchange is two calls: `begin_challenge` issues a single-prompt query
//! and records the identity it was issued to in the session state;
//! `challenge_response` validates the client's response list element-wise
//! against that identity's expected responses. A response with no challenge
//! outstanding is a protocol-order violation by the caller.

use tracing::debug;

use crate::warden::error::{Result, WardenError};
use crate::warden::session::SessionAuthState;
use crate::warden::types::{AuthOutcome, ChallengeDecision, InteractiveQuery};

use super::AuthenticationPolicy;
use super::directory::AccessRule;

impl AuthenticationPolicy {
    /// Begin a keyboard-interactive exchange for an identity.
    ///
    /// Qualifying identities receive a query with exactly one non-echoing
    /// "Password" prompt; everyone else is denied immediately. The
    /// `submethods` hint from the client is accepted and ignored.
    pub fn begin_challenge(
        &self,
        state: &mut SessionAuthState,
        identity: &str,
        submethods: &str,
    ) -> ChallengeDecision {
        match self.directory().get(identity).map(|p| &p.rule) {
            Some(AccessRule::Interactive { .. }) => {
                debug!(
                    "[{}] issuing interactive challenge to {} (submethods {:?} ignored)",
                    state.session_id(),
                    identity,
                    submethods
                );
                state.pending_challenge = Some(identity.to_string());
                ChallengeDecision::Challenge(InteractiveQuery::single(
                    "password",
                    "Please enter a password.",
                    "Password",
                    false,
                ))
            }
            _ => {
                debug!(
                    "[{}] interactive challenge denied for {}",
                    state.session_id(),
                    identity
                );
                ChallengeDecision::Denied
            }
        }
    }

    /// Validate an interactive response list against the pending challenge.
    ///
    /// Pending state is retained across responses, so a client may retry
    /// within the same exchange. Responding with no challenge outstanding is
    /// an error, not a failed outcome.
    pub fn challenge_response(
        &self,
        state: &mut SessionAuthState,
        responses: &[String],
    ) -> Result<AuthOutcome> {
        let Some(identity) = state.pending_challenge.as_deref() else {
            return Err(WardenError::NoPendingChallenge);
        };

        let outcome = match self.directory().get(identity).map(|p| &p.rule) {
            Some(AccessRule::Interactive { expected }) if responses == expected.as_slice() => {
                AuthOutcome::Successful
            }
            _ => AuthOutcome::Failed,
        };
        debug!(
            "[{}] interactive response for {}: {:?}",
            state.session_id(),
            identity,
            outcome
        );
        Ok(outcome)
    }
}
