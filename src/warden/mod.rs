//! SSH server decision engine module.
//!
//! This module is organized into the following submodules:
//!
//! - `types`: Core data-model types (outcomes, methods, credentials, channels)
//! - `error`: Engine fault and precondition-violation errors
//! - `config`: Configuration resolution with environment variable support
//! - `session`: Per-session mutable authentication state
//! - `auth`: Authentication policy, factor tracking, interactive challenges
//! - `channel`: Channel-open authorization and per-channel-type handlers
//! - `forward`: Remote port-forward registry (feature-gated)
//! - `interface`: The `ServerPolicy` contract driven by the transport layer
//! - `stub`: The concrete deterministic test-harness implementation

pub mod auth;
pub mod channel;
pub(crate) mod config;
pub mod error;
#[cfg(feature = "port_forward")]
pub mod forward;
pub mod interface;
pub mod session;
pub mod stub;
pub mod types;

pub use error::WardenError;
pub use interface::ServerPolicy;
pub use stub::{StubServer, StubServerBuilder};
