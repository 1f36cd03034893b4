//! Authentication policy for the decision engine.
//!
//! This module evaluates credentials against the closed per-identity policy
//! table and tracks multi-factor progress through the session's state.
//!
//! # Submodules
//!
//! - [`directory`]: the identity -> policy table and its access rules
//! - [`keys`]: reference fingerprints and the generic key-access policy
//! - [`factors`]: multi-factor verification tracking
//! - [`interactive`]: the keyboard-interactive challenge exchange
//!
//! # Evaluation model
//!
//! [`AuthenticationPolicy::evaluate`] dispatches on the credential variant;
//! each check consults the directory entry for the identity and, for
//! two-factor rules, records progress in the session's [`FactorTracker`].
//! Outcomes are values; `Err` is reserved for internal faults that must not
//! be mistaken for credential rejection.
//!
//! [`FactorTracker`]: factors::FactorTracker

pub mod directory;
pub mod factors;
pub mod interactive;
pub mod keys;

use std::time::Duration;

use tracing::{debug, warn};

use super::error::{Result, WardenError};
use super::session::SessionAuthState;
use super::types::{AuthMethod, AuthOutcome, Credential, PublicKeyCredential};

use directory::{AccessRule, IdentityDirectory};
use keys::KeyAccessPolicy;

/// Evaluates credentials for one session.
///
/// Immutable for the session's lifetime; all mutable progress lives in the
/// session's [`SessionAuthState`], which every check takes as a parameter.
#[derive(Debug)]
pub struct AuthenticationPolicy {
    directory: IdentityDirectory,
    key_access: KeyAccessPolicy,
    stall: Duration,
}

impl AuthenticationPolicy {
    pub fn new(directory: IdentityDirectory, key_access: KeyAccessPolicy, stall: Duration) -> Self {
        Self {
            directory,
            key_access,
            stall,
        }
    }

    pub(crate) fn directory(&self) -> &IdentityDirectory {
        &self.directory
    }

    /// Methods to advertise for an identity.
    ///
    /// Two-factor identities narrow to the factors still missing; identities
    /// absent from the directory are advertised public-key only.
    pub fn allowed_methods(&self, identity: &str, state: &SessionAuthState) -> Vec<AuthMethod> {
        match self.directory.get(identity) {
            Some(policy) => match &policy.rule {
                AccessRule::TwoFactor { .. } => state.factors.remaining_methods(),
                _ => policy.methods.clone(),
            },
            None => vec![AuthMethod::PublicKey],
        }
    }

    /// Single evaluation entry dispatching on the credential variant.
    pub async fn evaluate(
        &self,
        state: &mut SessionAuthState,
        identity: &str,
        credential: Credential<'_>,
    ) -> Result<AuthOutcome> {
        match credential {
            Credential::None => self.check_none(state, identity),
            Credential::Password(secret) => self.check_password(state, identity, secret).await,
            Credential::PublicKey(key) => self.check_public_key(state, identity, key),
        }
    }

    /// The "none" method: succeeds only for identities whose rule is
    /// `Anonymous`.
    pub fn check_none(&self, state: &SessionAuthState, identity: &str) -> Result<AuthOutcome> {
        let outcome = match self.directory.get(identity).map(|p| &p.rule) {
            Some(AccessRule::Anonymous) => AuthOutcome::Successful,
            _ => AuthOutcome::Failed,
        };
        debug!(
            "[{}] none-method check for {}: {:?}",
            state.session_id(),
            identity,
            outcome
        );
        Ok(outcome)
    }

    /// Password check. Byte-exact comparison; this is the only check that
    /// can stall (the designated slow secret) or fault (the faulty
    /// identity).
    pub async fn check_password(
        &self,
        state: &mut SessionAuthState,
        identity: &str,
        secret: &[u8],
    ) -> Result<AuthOutcome> {
        let Some(policy) = self.directory.get(identity) else {
            debug!(
                "[{}] password attempt for unknown identity {}",
                state.session_id(),
                identity
            );
            return Ok(AuthOutcome::Failed);
        };

        match &policy.rule {
            AccessRule::Password {
                secret: expected,
                slow_secret,
            } => {
                if let Some(slow) = slow_secret
                    && slow.as_slice() == secret
                {
                    // Genuine blocking pause on this call, for transport
                    // timeout testing. Must not be deferred or parallelized.
                    debug!(
                        "[{}] stalling {:?} before accepting password for {}",
                        state.session_id(),
                        self.stall,
                        identity
                    );
                    tokio::time::sleep(self.stall).await;
                    return Ok(AuthOutcome::Successful);
                }
                if expected.as_slice() == secret {
                    Ok(AuthOutcome::Successful)
                } else {
                    Ok(AuthOutcome::Failed)
                }
            }
            AccessRule::TwoFactor {
                secret: expected, ..
            } => {
                if expected.as_slice() == secret {
                    state.factors.record_password();
                    let outcome = state.factors.outcome();
                    debug!(
                        "[{}] password factor verified for {}: {:?}",
                        state.session_id(),
                        identity,
                        outcome
                    );
                    Ok(outcome)
                } else {
                    Ok(AuthOutcome::Failed)
                }
            }
            AccessRule::Faulty => {
                warn!(
                    "[{}] credential check hit the faulty identity {}",
                    state.session_id(),
                    identity
                );
                Err(WardenError::InternalFault)
            }
            AccessRule::Interactive { .. } | AccessRule::Anonymous => Ok(AuthOutcome::Failed),
        }
    }

    /// Public-key check.
    ///
    /// Two-factor identities first compare against their enrolled key and on
    /// a match record the factor; every other case falls through to the
    /// generic reference-fingerprint check (unknown identities included).
    pub fn check_public_key(
        &self,
        state: &mut SessionAuthState,
        identity: &str,
        credential: &PublicKeyCredential,
    ) -> Result<AuthOutcome> {
        if let Some(policy) = self.directory.get(identity)
            && let AccessRule::TwoFactor { key, .. } = &policy.rule
            && key.algorithm == credential.algorithm
            && key.fingerprint == credential.fingerprint
        {
            state.factors.record_public_key();
            let outcome = state.factors.outcome();
            debug!(
                "[{}] key factor verified for {}: {:?}",
                state.session_id(),
                identity,
                outcome
            );
            return Ok(outcome);
        }

        Ok(self.key_access.check(credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::directory::EnrolledKey;
    use super::keys::REFERENCE_FINGERPRINTS;

    fn two_factor_policy() -> AuthenticationPolicy {
        let mut directory = IdentityDirectory::new();
        directory.insert(
            "osprey",
            vec![AuthMethod::PublicKey, AuthMethod::Password],
            AccessRule::TwoFactor {
                secret: b"talon".to_vec(),
                key: EnrolledKey {
                    algorithm: "ssh-ed25519".to_string(),
                    fingerprint: REFERENCE_FINGERPRINTS["ssh-ed25519"],
                },
            },
        );
        AuthenticationPolicy::new(directory, KeyAccessPolicy::default(), Duration::ZERO)
    }

    fn enrolled_credential() -> PublicKeyCredential {
        PublicKeyCredential {
            algorithm: "ssh-ed25519".to_string(),
            fingerprint: REFERENCE_FINGERPRINTS["ssh-ed25519"],
            public_blob: None,
        }
    }

    mod password {
        use super::*;

        #[tokio::test]
        async fn test_byte_exact_comparison() {
            let mut directory = IdentityDirectory::new();
            directory.insert(
                "petrel",
                vec![AuthMethod::Password],
                AccessRule::Password {
                    secret: vec![0xff],
                    slow_secret: None,
                },
            );
            let policy =
                AuthenticationPolicy::new(directory, KeyAccessPolicy::default(), Duration::ZERO);
            let mut state = SessionAuthState::new();

            let outcome = policy
                .check_password(&mut state, "petrel", &[0xff])
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Successful);

            let outcome = policy
                .check_password(&mut state, "petrel", &[0xfe])
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed);
        }

        #[tokio::test]
        async fn test_unknown_identity_fails() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();
            let outcome = policy
                .check_password(&mut state, "stranger", b"anything")
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed);
        }

        #[tokio::test]
        async fn test_faulty_identity_propagates_err() {
            let mut directory = IdentityDirectory::new();
            directory.insert("cormorant", vec![AuthMethod::Password], AccessRule::Faulty);
            let policy =
                AuthenticationPolicy::new(directory, KeyAccessPolicy::default(), Duration::ZERO);
            let mut state = SessionAuthState::new();

            let result = policy
                .check_password(&mut state, "cormorant", b"anything")
                .await;
            assert!(matches!(result, Err(WardenError::InternalFault)));
        }
    }

    mod two_factor {
        use super::*;

        #[tokio::test]
        async fn test_password_then_key() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            let outcome = policy
                .check_password(&mut state, "osprey", b"talon")
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::PartiallySuccessful);

            let outcome = policy
                .check_public_key(&mut state, "osprey", &enrolled_credential())
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Successful);
        }

        #[tokio::test]
        async fn test_key_then_password() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            let outcome = policy
                .check_public_key(&mut state, "osprey", &enrolled_credential())
                .unwrap();
            assert_eq!(outcome, AuthOutcome::PartiallySuccessful);

            let outcome = policy
                .check_password(&mut state, "osprey", b"talon")
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Successful);
        }

        #[tokio::test]
        async fn test_repeating_one_factor_stays_partial() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            for _ in 0..3 {
                let outcome = policy
                    .check_password(&mut state, "osprey", b"talon")
                    .await
                    .unwrap();
                assert_eq!(outcome, AuthOutcome::PartiallySuccessful);
            }
        }

        #[tokio::test]
        async fn test_wrong_password_does_not_record_factor() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            let outcome = policy
                .check_password(&mut state, "osprey", b"wrong")
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed);
            assert!(!state.factors.password_verified());
        }

        #[test]
        fn test_non_enrolled_key_falls_through_to_generic_check() {
            // Generic policy has an empty allowed set, so fallthrough fails.
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            let mut credential = enrolled_credential();
            credential.fingerprint[0] ^= 0xff;
            let outcome = policy
                .check_public_key(&mut state, "osprey", &credential)
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed);
            assert!(!state.factors.public_key_verified());
        }
    }

    mod allowed_methods {
        use super::*;

        #[test]
        fn test_unknown_identity_gets_publickey_only() {
            let policy = two_factor_policy();
            let state = SessionAuthState::new();
            assert_eq!(
                policy.allowed_methods("stranger", &state),
                vec![AuthMethod::PublicKey]
            );
        }

        #[tokio::test]
        async fn test_two_factor_narrows_with_progress() {
            let policy = two_factor_policy();
            let mut state = SessionAuthState::new();

            assert_eq!(
                policy.allowed_methods("osprey", &state),
                vec![AuthMethod::PublicKey, AuthMethod::Password]
            );

            policy
                .check_password(&mut state, "osprey", b"talon")
                .await
                .unwrap();
            assert_eq!(
                policy.allowed_methods("osprey", &state),
                vec![AuthMethod::PublicKey]
            );
        }
    }

    mod evaluate {
        use super::*;

        #[tokio::test]
        async fn test_dispatches_on_credential_variant() {
            let mut directory = IdentityDirectory::new();
            directory.insert("gannet", vec![AuthMethod::None], AccessRule::Anonymous);
            let policy =
                AuthenticationPolicy::new(directory, KeyAccessPolicy::default(), Duration::ZERO);
            let mut state = SessionAuthState::new();

            let outcome = policy
                .evaluate(&mut state, "gannet", Credential::None)
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Successful);

            let outcome = policy
                .evaluate(&mut state, "gannet", Credential::Password(b"anything"))
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Failed);
        }
    }
}
