//! Engine errors: internal faults and precondition violations.
//!
//! Authentication *outcomes* (successful / partially successful / failed) are
//! ordinary values, never errors. `WardenError` is reserved for two things:
//!
//! 1. **Internal faults**: the engine itself broke while evaluating a
//!    request. These must cross the [`ServerPolicy`] boundary as `Err` so the
//!    transport layer can distinguish "the server broke" from "the credential
//!    was wrong". Folding a fault into `AuthOutcome::Failed` is a correctness
//!    bug.
//! 2. **Precondition violations**: the transport layer called a handler in an
//!    order the protocol does not permit (e.g. a channel request for a
//!    channel that was never opened).
//!
//! [`ServerPolicy`]: crate::warden::interface::ServerPolicy

use thiserror::Error;

use super::types::ChannelId;

/// Errors surfaced across the decision-engine boundary.
#[derive(Debug, Error)]
pub enum WardenError {
    /// The server itself failed while evaluating a credential. Deliberately
    /// distinct from `AuthOutcome::Failed`; must propagate uncaught.
    #[error("internal fault while evaluating credential")]
    InternalFault,

    /// An interactive response arrived with no challenge outstanding.
    #[error("interactive response received with no pending challenge")]
    NoPendingChallenge,

    /// A per-channel request named a channel whose open was never authorized.
    #[error("channel {0} was never opened on this session")]
    UnknownChannel(ChannelId),

    /// A port-forward request named an (address, port) key that already has a
    /// live listener.
    #[error("a forward listener is already active for {address}:{port}")]
    ForwardInUse { address: String, port: u32 },

    /// A cancel named an (address, port) key with no active listener.
    #[error("no forward listener registered for {address}:{port}")]
    ForwardNotFound { address: String, port: u32 },

    /// Binding the forward listener socket failed.
    #[error("failed to bind forward listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WardenError::UnknownChannel(ChannelId(7)).to_string(),
            "channel 7 was never opened on this session"
        );
        assert_eq!(
            WardenError::ForwardInUse {
                address: "".to_string(),
                port: 2222,
            }
            .to_string(),
            "a forward listener is already active for :2222"
        );
    }

    #[test]
    fn test_bind_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err: WardenError = io.into();
        assert!(matches!(err, WardenError::Bind(_)));
    }
}
