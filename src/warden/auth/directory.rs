//! Identity directory: the closed per-identity policy table.
//!
//! Each identity maps to an [`IdentityPolicy`] naming the methods it is
//! advertised and the [`AccessRule`] its credentials are evaluated under.
//! The table is closed and exhaustively matched; there is no string-pattern
//! dispatch at evaluation time. Identities absent from the directory fall
//! back to a public-key-only policy handled by the caller.

use std::collections::HashMap;

use crate::warden::types::AuthMethod;

/// A public key enrolled as the second factor of a two-factor identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledKey {
    pub algorithm: String,
    pub fingerprint: [u8; 16],
}

/// How an identity's credentials are evaluated.
#[derive(Debug, Clone)]
pub enum AccessRule {
    /// Single-factor password. The comparison is byte-exact; secrets are not
    /// required to be valid UTF-8. Presenting `slow_secret` triggers the
    /// deliberate multi-second stall before succeeding.
    Password {
        secret: Vec<u8>,
        slow_secret: Option<Vec<u8>>,
    },
    /// Password and enrolled public key must both verify within the session.
    TwoFactor { secret: Vec<u8>, key: EnrolledKey },
    /// Only keyboard-interactive succeeds, against this expected response
    /// list.
    Interactive { expected: Vec<String> },
    /// The "none" method succeeds without any credential.
    Anonymous,
    /// Credential checks for this identity raise an internal fault. Exists
    /// so transport-layer suites can verify faults are not masked as
    /// ordinary failures.
    Faulty,
}

/// Methods advertised plus the evaluation rule for one identity.
#[derive(Debug, Clone)]
pub struct IdentityPolicy {
    pub methods: Vec<AuthMethod>,
    pub rule: AccessRule,
}

/// The closed mapping from identity to policy.
#[derive(Debug, Default)]
pub struct IdentityDirectory {
    entries: HashMap<String, IdentityPolicy>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a policy for an identity, replacing any existing entry.
    pub fn insert(
        &mut self,
        identity: impl Into<String>,
        methods: Vec<AuthMethod>,
        rule: AccessRule,
    ) {
        self.entries
            .insert(identity.into(), IdentityPolicy { methods, rule });
    }

    pub fn get(&self, identity: &str) -> Option<&IdentityPolicy> {
        self.entries.get(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
