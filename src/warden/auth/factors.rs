//! Multi-factor verification tracking for one session.

use crate::warden::types::{AuthMethod, AuthOutcome};

/// Tracks which authentication factors have verified within one session.
///
/// One instance per session, owned by that session's state; never shared.
/// Flags are monotonic and idempotent: recording a factor twice is a no-op,
/// and nothing ever clears a recorded factor.
#[derive(Debug, Default)]
pub struct FactorTracker {
    password_verified: bool,
    public_key_verified: bool,
}

impl FactorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the password factor verified.
    pub fn record_password(&mut self) {
        self.password_verified = true;
    }

    /// Record that the public-key factor verified.
    pub fn record_public_key(&mut self) {
        self.public_key_verified = true;
    }

    pub fn password_verified(&self) -> bool {
        self.password_verified
    }

    pub fn public_key_verified(&self) -> bool {
        self.public_key_verified
    }

    /// Outcome for a two-factor identity given current progress:
    /// both factors verified -> `Successful`, exactly one ->
    /// `PartiallySuccessful`, neither -> `Failed`.
    pub fn outcome(&self) -> AuthOutcome {
        match (self.password_verified, self.public_key_verified) {
            (true, true) => AuthOutcome::Successful,
            (false, false) => AuthOutcome::Failed,
            _ => AuthOutcome::PartiallySuccessful,
        }
    }

    /// Methods still worth advertising to a two-factor identity.
    ///
    /// Before any factor verifies the client may pick either; once one
    /// factor is in, only the other is offered.
    pub fn remaining_methods(&self) -> Vec<AuthMethod> {
        if !self.password_verified && !self.public_key_verified {
            vec![AuthMethod::PublicKey, AuthMethod::Password]
        } else if self.password_verified {
            vec![AuthMethod::PublicKey]
        } else {
            vec![AuthMethod::Password]
        }
    }
}
