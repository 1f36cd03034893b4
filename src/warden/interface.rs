//! The `ServerPolicy` contract between the transport layer and the engine.
//!
//! An external transport/connection-protocol collaborator parses the wire
//! and drives these callbacks sequentially for one session. Every default
//! body rejects: a type implementing nothing is a server that lets nobody in
//! and opens no channels, mirroring how a server interface should fail
//! closed. Implementations override only the decisions they take.

use async_trait::async_trait;

use super::error::Result;
use super::types::{
    AuthMethod, AuthOutcome, ChallengeDecision, ChannelDecision, ChannelId, ForwardTarget,
    PublicKeyCredential,
};

/// Decision callbacks a server-side SSH endpoint must provide.
///
/// Calls arrive sequentially from the transport dispatcher; one instance
/// serves exactly one session. `&mut self` because most decisions mutate
/// per-session state (factor progress, channel registry, forwards).
#[async_trait]
pub trait ServerPolicy: Send {
    /// Authentication methods to advertise for an identity.
    fn allowed_methods(&self, _identity: &str) -> Vec<AuthMethod> {
        Vec::new()
    }

    /// Evaluate the "none" method.
    async fn check_auth_none(&mut self, _identity: &str) -> Result<AuthOutcome> {
        Ok(AuthOutcome::Failed)
    }

    /// Evaluate a password credential. The secret is raw bytes; it is not
    /// required to be valid UTF-8.
    async fn check_auth_password(
        &mut self,
        _identity: &str,
        _secret: &[u8],
    ) -> Result<AuthOutcome> {
        Ok(AuthOutcome::Failed)
    }

    /// Evaluate a public-key credential.
    async fn check_auth_public_key(
        &mut self,
        _identity: &str,
        _credential: &PublicKeyCredential,
    ) -> Result<AuthOutcome> {
        Ok(AuthOutcome::Failed)
    }

    /// Begin a keyboard-interactive exchange.
    async fn begin_interactive(
        &mut self,
        _identity: &str,
        _submethods: &str,
    ) -> Result<ChallengeDecision> {
        Ok(ChallengeDecision::Denied)
    }

    /// Validate the responses to an outstanding interactive challenge.
    async fn interactive_response(&mut self, _responses: &[String]) -> Result<AuthOutcome> {
        Ok(AuthOutcome::Failed)
    }

    /// Authorize a channel-open request.
    async fn channel_open_request(
        &mut self,
        _kind: &str,
        _id: ChannelId,
    ) -> Result<ChannelDecision> {
        Ok(ChannelDecision::AdministrativelyProhibited)
    }

    /// Handle an exec request on an opened channel.
    async fn exec_request(&mut self, _id: ChannelId, _command: &[u8]) -> Result<bool> {
        Ok(false)
    }

    /// Handle an environment-variable request on an opened channel.
    async fn env_request(&mut self, _id: ChannelId, _name: &str, _value: &str) -> Result<bool> {
        Ok(false)
    }

    /// Handle a shell request on an opened channel.
    async fn shell_request(&mut self, _id: ChannelId) -> Result<bool> {
        Ok(false)
    }

    /// Handle a session-scoped global request.
    async fn global_request(&mut self, _kind: &str, _payload: &[u8]) -> Result<bool> {
        Ok(false)
    }

    /// Handle an X11 forwarding request on an opened channel.
    async fn x11_request(
        &mut self,
        _id: ChannelId,
        _single_connection: bool,
        _auth_protocol: &str,
        _auth_cookie: &str,
        _screen_number: u32,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Authorize a direct-tcpip channel-open request.
    async fn direct_tcpip_request(
        &mut self,
        _id: ChannelId,
        _origin: &ForwardTarget,
        _destination: &ForwardTarget,
    ) -> Result<ChannelDecision> {
        Ok(ChannelDecision::AdministrativelyProhibited)
    }

    /// Handle a remote port-forward request. `Some(port)` grants the forward
    /// and names the bound port to relay to the client; `None` declines.
    async fn port_forward_request(&mut self, _address: &str, _port: u32) -> Result<Option<u16>> {
        Ok(None)
    }

    /// Release a previously granted port forward.
    async fn cancel_port_forward(&mut self, _address: &str, _port: u32) -> Result<()> {
        Ok(())
    }
}
