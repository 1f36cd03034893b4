//! Core data-model types for the SSH decision engine.
//!
//! These types form the vocabulary shared between the engine and the external
//! transport layer: authentication outcomes and methods, credentials as handed
//! over by the transport after parsing, interactive challenge queries, and
//! channel addressing.

use std::fmt;

/// Result of a single authentication attempt.
///
/// `PartiallySuccessful` is not an error: it signals the client to continue
/// authenticating with another method within the same session. `Failed` is
/// terminal for that specific attempt only; retry policy lives in the
/// transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Every factor the identity's policy requires has been verified.
    Successful,
    /// One of several required factors is verified; more are required.
    PartiallySuccessful,
    /// The presented credential was rejected.
    Failed,
}

/// Authentication methods the engine can advertise to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    None,
    Password,
    PublicKey,
    KeyboardInteractive,
}

impl AuthMethod {
    /// The method name as it appears on the wire (RFC 4252).
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::Password => "password",
            AuthMethod::PublicKey => "publickey",
            AuthMethod::KeyboardInteractive => "keyboard-interactive",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public-key credential as parsed by the transport layer.
///
/// The engine never inspects raw key material; it compares the algorithm
/// name, the 16-byte fingerprint digest, and (when a policy pins one) the
/// full public blob, e.g. a certificate payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyCredential {
    /// Key algorithm name, e.g. `ssh-ed25519`.
    pub algorithm: String,
    /// 16-byte fingerprint digest of the key.
    pub fingerprint: [u8; 16],
    /// Full public blob when the client presented one (certificate payload).
    pub public_blob: Option<Vec<u8>>,
}

/// A credential presented by the client, tagged by method.
///
/// Borrowed from the transport's parse buffers; the engine copies nothing
/// it does not need to retain.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// The "none" method: no credential material at all.
    None,
    /// A password secret. Byte slice rather than `&str` because secrets are
    /// not required to be valid UTF-8.
    Password(&'a [u8]),
    /// A public key (optionally with certificate blob).
    PublicKey(&'a PublicKeyCredential),
}

/// One prompt within a keyboard-interactive challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Label shown to the user, e.g. `Password`.
    pub label: String,
    /// Whether the client should echo the typed response.
    pub echo: bool,
}

/// A keyboard-interactive challenge: a name, an instruction, and an ordered
/// list of prompts the client must answer in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveQuery {
    pub name: String,
    pub instruction: String,
    pub prompts: Vec<Prompt>,
}

impl InteractiveQuery {
    /// Build a challenge with a single prompt.
    pub fn single(
        name: impl Into<String>,
        instruction: impl Into<String>,
        label: impl Into<String>,
        echo: bool,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            prompts: vec![Prompt {
                label: label.into(),
                echo,
            }],
        }
    }
}

/// Decision on a request to begin a keyboard-interactive exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeDecision {
    /// The challenge to relay to the client.
    Challenge(InteractiveQuery),
    /// The identity does not qualify for keyboard-interactive auth.
    Denied,
}

/// Decision on a channel-open request.
///
/// Kept distinct from the boolean accept/reject used by per-channel-type
/// handlers so callers can surface richer diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDecision {
    Open,
    AdministrativelyProhibited,
}

/// Transport-assigned channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (host, port) endpoint used for direct-tcpip origin/destination
/// addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    pub host: String,
    pub port: u32,
}

impl ForwardTarget {
    pub fn new(host: impl Into<String>, port: u32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
