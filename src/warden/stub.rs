//! The deterministic test-harness server.
//!
//! `StubServer` is the one concrete [`ServerPolicy`] implementation shipped
//! by this crate. Its identity directory, channel policy knobs, and key
//! fingerprints are fixed so transport-layer test suites can assert exact
//! behavior.
//!
//! # Fixture identities
//!
//! | Identity | Behavior |
//! |----------|----------|
//! | `heron` | password `estuary`; the slow secret `glacial` stalls first |
//! | `osprey` | two-factor: password `talon` + enrolled ssh-ed25519 key |
//! | `kestrel` | keyboard-interactive; expected response `windhover` |
//! | `plover` | password is the UTF-8 bullet `•` |
//! | `petrel` | password is the single non-UTF-8 byte `0xff` |
//! | `gannet` | the "none" method succeeds |
//! | `cormorant` | credential checks raise an internal fault |
//! | anyone else | public-key only, against the reference fingerprints |
//!
//! Channel fixtures: channel kind `blocked` is administratively prohibited,
//! the only accepted exec command is `ping`, and the environment variable
//! `RESTRICTED` is rejected.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::auth::AuthenticationPolicy;
use super::auth::directory::{AccessRule, EnrolledKey, IdentityDirectory};
use super::auth::keys::{KeyAccessPolicy, REFERENCE_FINGERPRINTS};
use super::channel::ChannelAuthority;
use super::config;
use super::error::Result;
#[cfg(feature = "port_forward")]
use super::forward::PortForwardRegistry;
use super::interface::ServerPolicy;
use super::session::SessionAuthState;
use super::types::{
    AuthMethod, AuthOutcome, ChallengeDecision, ChannelDecision, ChannelId, ForwardTarget,
    PublicKeyCredential,
};

/// Channel kind rejected as administratively prohibited.
pub const BLOCKED_CHANNEL_KIND: &str = "blocked";

/// The only exec command the harness accepts.
pub const ACCEPTED_EXEC_COMMAND: &[u8] = b"ping";

/// Environment variable name the harness refuses to set.
pub const RESTRICTED_ENV_VAR: &str = "RESTRICTED";

/// Fluent builder for [`StubServer`].
///
/// Tests enable the key algorithms they exercise, optionally pin an expected
/// public blob (certificate payload), and may shorten the slow-credential
/// stall.
///
/// # Example
///
/// ```ignore
/// let server = StubServer::builder()
///     .with_allowed_key_algorithm("ssh-ed25519")
///     .with_stall_secs(1)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct StubServerBuilder {
    allowed_key_algorithms: Vec<String>,
    pinned_public_blob: Option<Vec<u8>>,
    stall_secs: Option<u64>,
}

impl StubServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a public-key algorithm for the generic key check.
    pub fn with_allowed_key_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.allowed_key_algorithms.push(algorithm.into());
        self
    }

    /// Pin an expected public blob; key credentials must then carry exactly
    /// this blob to pass the generic check.
    pub fn with_pinned_public_blob(mut self, blob: impl Into<Vec<u8>>) -> Self {
        self.pinned_public_blob = Some(blob.into());
        self
    }

    /// Override the slow-credential stall duration. Takes priority over the
    /// `WARDEN_STALL_SECS` environment variable.
    pub fn with_stall_secs(mut self, secs: u64) -> Self {
        self.stall_secs = Some(secs);
        self
    }

    pub fn build(self) -> StubServer {
        let stall = Duration::from_secs(config::resolve_stall_secs(self.stall_secs));
        let key_access = KeyAccessPolicy::new(self.allowed_key_algorithms, self.pinned_public_blob);
        let state = SessionAuthState::new();
        info!(
            "[{}] stub server session created (stall {:?})",
            state.session_id(),
            stall
        );
        StubServer {
            policy: AuthenticationPolicy::new(fixture_directory(), key_access, stall),
            state,
            channels: ChannelAuthority::new(
                BLOCKED_CHANNEL_KIND,
                ACCEPTED_EXEC_COMMAND.to_vec(),
                RESTRICTED_ENV_VAR,
            ),
            #[cfg(feature = "port_forward")]
            forwards: PortForwardRegistry::new(),
        }
    }
}

/// The fixed identity directory driving the harness's auth decisions.
fn fixture_directory() -> IdentityDirectory {
    let mut directory = IdentityDirectory::new();
    directory.insert(
        "heron",
        vec![AuthMethod::PublicKey, AuthMethod::Password],
        AccessRule::Password {
            secret: b"estuary".to_vec(),
            slow_secret: Some(b"glacial".to_vec()),
        },
    );
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
    directory.insert(
        "kestrel",
        vec![AuthMethod::KeyboardInteractive],
        AccessRule::Interactive {
            expected: vec!["windhover".to_string()],
        },
    );
    directory.insert(
        "plover",
        vec![AuthMethod::Password],
        AccessRule::Password {
            secret: "\u{2022}".as_bytes().to_vec(),
            slow_secret: None,
        },
    );
    directory.insert(
        "petrel",
        vec![AuthMethod::Password],
        AccessRule::Password {
            secret: vec![0xff],
            slow_secret: None,
        },
    );
    directory.insert("gannet", vec![AuthMethod::None], AccessRule::Anonymous);
    directory.insert("cormorant", vec![AuthMethod::Password], AccessRule::Faulty);
    directory
}

/// Deterministic server-side decision engine for one session.
///
/// One instance per session; no state is shared between instances, so
/// concurrent sessions are isolated by construction.
#[derive(Debug)]
pub struct StubServer {
    policy: AuthenticationPolicy,
    state: SessionAuthState,
    channels: ChannelAuthority,
    #[cfg(feature = "port_forward")]
    forwards: PortForwardRegistry,
}

impl StubServer {
    /// A harness with default knobs (no key algorithms enabled, no pinned
    /// blob, default stall).
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::new()
    }

    /// Session identifier for log correlation.
    pub fn session_id(&self) -> Uuid {
        self.state.session_id()
    }

    /// Channel registry, for test assertions.
    pub fn channels(&self) -> &ChannelAuthority {
        &self.channels
    }

    /// Forward registry, for test assertions.
    #[cfg(feature = "port_forward")]
    pub fn forwards(&self) -> &PortForwardRegistry {
        &self.forwards
    }
}

impl Default for StubServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerPolicy for StubServer {
    fn allowed_methods(&self, identity: &str) -> Vec<AuthMethod> {
        self.policy.allowed_methods(identity, &self.state)
    }

    async fn check_auth_none(&mut self, identity: &str) -> Result<AuthOutcome> {
        self.policy.check_none(&self.state, identity)
    }

    async fn check_auth_password(&mut self, identity: &str, secret: &[u8]) -> Result<AuthOutcome> {
        self.policy
            .check_password(&mut self.state, identity, secret)
            .await
    }

    async fn check_auth_public_key(
        &mut self,
        identity: &str,
        credential: &PublicKeyCredential,
    ) -> Result<AuthOutcome> {
        self.policy
            .check_public_key(&mut self.state, identity, credential)
    }

    async fn begin_interactive(
        &mut self,
        identity: &str,
        submethods: &str,
    ) -> Result<ChallengeDecision> {
        Ok(self
            .policy
            .begin_challenge(&mut self.state, identity, submethods))
    }

    async fn interactive_response(&mut self, responses: &[String]) -> Result<AuthOutcome> {
        self.policy.challenge_response(&mut self.state, responses)
    }

    async fn channel_open_request(&mut self, kind: &str, id: ChannelId) -> Result<ChannelDecision> {
        Ok(self.channels.authorize_open(kind, id))
    }

    async fn exec_request(&mut self, id: ChannelId, command: &[u8]) -> Result<bool> {
        self.channels.exec_request(id, command)
    }

    async fn env_request(&mut self, id: ChannelId, name: &str, value: &str) -> Result<bool> {
        self.channels.env_request(id, name, value)
    }

    async fn shell_request(&mut self, id: ChannelId) -> Result<bool> {
        self.channels.shell_request(id)
    }

    async fn global_request(&mut self, kind: &str, payload: &[u8]) -> Result<bool> {
        Ok(self.channels.global_request(kind, payload))
    }

    async fn x11_request(
        &mut self,
        id: ChannelId,
        single_connection: bool,
        auth_protocol: &str,
        auth_cookie: &str,
        screen_number: u32,
    ) -> Result<bool> {
        self.channels
            .x11_request(id, single_connection, auth_protocol, auth_cookie, screen_number)
    }

    async fn direct_tcpip_request(
        &mut self,
        id: ChannelId,
        origin: &ForwardTarget,
        destination: &ForwardTarget,
    ) -> Result<ChannelDecision> {
        Ok(self.channels.direct_tcpip_request(id, origin, destination))
    }

    #[cfg(feature = "port_forward")]
    async fn port_forward_request(&mut self, address: &str, port: u32) -> Result<Option<u16>> {
        let bound = self.forwards.request(address, port).await?;
        Ok(Some(bound))
    }

    #[cfg(feature = "port_forward")]
    async fn cancel_port_forward(&mut self, address: &str, port: u32) -> Result<()> {
        self.forwards.cancel(address, port)
    }
}
