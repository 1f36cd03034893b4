//! Public-key reference fingerprints and the generic key-access policy.
//!
//! The harness recognizes one well-known key per algorithm, identified by a
//! fixed 16-byte fingerprint. A credential passes the generic check when its
//! algorithm is enabled for the session, its fingerprint equals the reference
//! value byte-for-byte, and — when the policy pins an expected public blob —
//! the presented blob matches exactly.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::warden::types::{AuthOutcome, PublicKeyCredential};

/// Reference fingerprint for each supported public-key algorithm.
///
/// Comparisons must use these exact byte values.
pub static REFERENCE_FINGERPRINTS: Lazy<HashMap<&'static str, [u8; 16]>> = Lazy::new(|| {
    HashMap::from([
        (
            "ssh-dss",
            [
                0x44, 0x78, 0xf0, 0xb9, 0xa2, 0x3c, 0xc5, 0x18, 0x20, 0x09, 0xff, 0x75, 0x5b,
                0xc1, 0xd2, 0x6c,
            ],
        ),
        (
            "ssh-rsa",
            [
                0x60, 0x73, 0x38, 0x44, 0xcb, 0x51, 0x86, 0x65, 0x7f, 0xde, 0xda, 0xa2, 0x2b,
                0x5a, 0x57, 0xd5,
            ],
        ),
        (
            "ecdsa-sha2-nistp256",
            [
                0x25, 0x19, 0xeb, 0x55, 0xe6, 0xa1, 0x47, 0xff, 0x4f, 0x38, 0xd2, 0x75, 0x6f,
                0xa5, 0xd5, 0x60,
            ],
        ),
        (
            "ssh-ed25519",
            [
                0xb3, 0xd5, 0x22, 0xaa, 0xf9, 0x75, 0x5e, 0xe8, 0xcd, 0x0e, 0xea, 0x02, 0xb9,
                0x29, 0xa2, 0x80,
            ],
        ),
    ])
});

/// Generic public-key acceptance policy for a session.
///
/// Tests enable the specific algorithms they exercise; an empty allowed set
/// rejects every key. Pinning a public blob additionally requires the
/// presented credential to carry exactly that blob.
#[derive(Debug, Default)]
pub struct KeyAccessPolicy {
    allowed_algorithms: Vec<String>,
    pinned_blob: Option<Vec<u8>>,
}

impl KeyAccessPolicy {
    pub fn new(allowed_algorithms: Vec<String>, pinned_blob: Option<Vec<u8>>) -> Self {
        Self {
            allowed_algorithms,
            pinned_blob,
        }
    }

    /// Evaluate a credential against the reference table and this policy.
    pub fn check(&self, credential: &PublicKeyCredential) -> AuthOutcome {
        let Some(expected) = REFERENCE_FINGERPRINTS.get(credential.algorithm.as_str()) else {
            debug!("Unknown key algorithm {}", credential.algorithm);
            return AuthOutcome::Failed;
        };

        // Base check: allowed algorithm & fingerprint matches
        let mut happy = self
            .allowed_algorithms
            .iter()
            .any(|a| a == &credential.algorithm)
            && credential.fingerprint == *expected;

        // Secondary check: pinned public blob must match exactly
        if let Some(pinned) = &self.pinned_blob
            && credential.public_blob.as_deref() != Some(pinned.as_slice())
        {
            happy = false;
        }

        if happy {
            AuthOutcome::Successful
        } else {
            AuthOutcome::Failed
        }
    }
}
