//! Channel-open authorization and per-channel-type request handlers.
//!
//! # Architecture
//!
//! The transport layer multiplexes logical channels over one session. Every
//! channel-open request is authorized here first; only channels whose open
//! was authorized are registered, and per-type follow-up requests (exec,
//! env, shell, X11) on an unregistered channel are a protocol-order
//! violation by the caller, surfaced as [`WardenError::UnknownChannel`].
//!
//! Channel-open rejection keeps an explicit "administratively prohibited"
//! decision, while per-type handlers report plain boolean accept/reject; the
//! two signals stay distinct so the transport can map them to their
//! respective wire replies.

use std::collections::HashMap;

use tracing::debug;

use super::error::{Result, WardenError};
use super::types::{ChannelDecision, ChannelId, ForwardTarget};

/// X11 forwarding parameters recorded verbatim from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X11Params {
    pub single_connection: bool,
    pub auth_protocol: String,
    pub auth_cookie: String,
    pub screen_number: u32,
}

/// State kept for one authorized channel.
#[derive(Debug)]
pub struct ChannelState {
    pub id: ChannelId,
    pub kind: String,
    /// Environment mapping, created lazily on the first accepted env
    /// request so tests can observe the laziness.
    env: Option<HashMap<String, String>>,
    pub x11: Option<X11Params>,
    /// Destination recorded for direct-tcpip channels.
    pub tcpip_destination: Option<ForwardTarget>,
}

impl ChannelState {
    fn new(id: ChannelId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            env: None,
            x11: None,
            tcpip_destination: None,
        }
    }

    /// The channel's environment mapping, if any env request was accepted.
    pub fn env(&self) -> Option<&HashMap<String, String>> {
        self.env.as_ref()
    }
}

/// Authorizes channel opens and per-channel-type requests for one session.
#[derive(Debug)]
pub struct ChannelAuthority {
    blocked_kind: String,
    accepted_command: Vec<u8>,
    restricted_env: String,
    channels: HashMap<ChannelId, ChannelState>,
    last_global_request: Option<String>,
}

impl ChannelAuthority {
    pub fn new(
        blocked_kind: impl Into<String>,
        accepted_command: impl Into<Vec<u8>>,
        restricted_env: impl Into<String>,
    ) -> Self {
        Self {
            blocked_kind: blocked_kind.into(),
            accepted_command: accepted_command.into(),
            restricted_env: restricted_env.into(),
            channels: HashMap::new(),
            last_global_request: None,
        }
    }

    /// Authorize a channel-open request. The blocked kind is rejected as
    /// administratively prohibited; every other kind is opened and the
    /// channel registered.
    pub fn authorize_open(&mut self, kind: &str, id: ChannelId) -> ChannelDecision {
        if kind == self.blocked_kind {
            debug!("Channel {} open for kind {} prohibited", id, kind);
            return ChannelDecision::AdministrativelyProhibited;
        }
        debug!("Channel {} opened with kind {}", id, kind);
        self.channels.insert(id, ChannelState::new(id, kind));
        ChannelDecision::Open
    }

    /// Accept an exec request iff the command equals the one accepted byte
    /// string exactly.
    pub fn exec_request(&mut self, id: ChannelId, command: &[u8]) -> Result<bool> {
        self.channel_mut(id)?;
        let accepted = command == self.accepted_command.as_slice();
        debug!(
            "Exec request on channel {} ({} bytes): {}",
            id,
            command.len(),
            if accepted { "accepted" } else { "rejected" }
        );
        Ok(accepted)
    }

    /// Store an environment variable on the channel, rejecting the one
    /// restricted name. The mapping is created on first accepted call.
    pub fn env_request(&mut self, id: ChannelId, name: &str, value: &str) -> Result<bool> {
        if name == self.restricted_env {
            debug!("Env request for restricted variable {} rejected", name);
            // Still a protocol-order violation if the channel is unknown
            self.channel_mut(id)?;
            return Ok(false);
        }

        let channel = self.channel_mut(id)?;
        channel
            .env
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        Ok(true)
    }

    /// Shell requests are always accepted.
    pub fn shell_request(&mut self, id: ChannelId) -> Result<bool> {
        self.channel_mut(id)?;
        Ok(true)
    }

    /// Record a session-scoped global request and decline it. Models
    /// fire-and-forget global requests with no handler.
    pub fn global_request(&mut self, kind: &str, payload: &[u8]) -> bool {
        debug!("Global request {} ({} bytes) declined", kind, payload.len());
        self.last_global_request = Some(kind.to_string());
        false
    }

    /// Record X11 forwarding parameters verbatim on the channel and accept.
    pub fn x11_request(
        &mut self,
        id: ChannelId,
        single_connection: bool,
        auth_protocol: &str,
        auth_cookie: &str,
        screen_number: u32,
    ) -> Result<bool> {
        let channel = self.channel_mut(id)?;
        channel.x11 = Some(X11Params {
            single_connection,
            auth_protocol: auth_protocol.to_string(),
            auth_cookie: auth_cookie.to_string(),
            screen_number,
        });
        Ok(true)
    }

    /// Authorize a direct-tcpip channel open, recording its destination.
    pub fn direct_tcpip_request(
        &mut self,
        id: ChannelId,
        origin: &ForwardTarget,
        destination: &ForwardTarget,
    ) -> ChannelDecision {
        debug!(
            "Direct-tcpip channel {} from {} to {}",
            id, origin, destination
        );
        let mut channel = ChannelState::new(id, "direct-tcpip");
        channel.tcpip_destination = Some(destination.clone());
        self.channels.insert(id, channel);
        ChannelDecision::Open
    }

    /// Inspect a registered channel's state.
    pub fn channel(&self, id: ChannelId) -> Option<&ChannelState> {
        self.channels.get(&id)
    }

    /// The kind of the most recent global request, for test assertions.
    pub fn last_global_request(&self) -> Option<&str> {
        self.last_global_request.as_deref()
    }

    fn channel_mut(&mut self, id: ChannelId) -> Result<&mut ChannelState> {
        self.channels
            .get_mut(&id)
            .ok_or(WardenError::UnknownChannel(id))
    }
}
