//! Server-side SSH decision engine.
//!
//! This crate implements the policy decisions an SSH server makes once the
//! transport layer hands it parsed requests: which authentication methods are
//! offered per identity, how multi-factor (partial-success) authentication is
//! tracked across attempts, how keyboard-interactive exchanges are conducted,
//! and how channel-open and per-channel-type requests are authorized.
//!
//! Wire framing, encryption, key exchange, and socket plumbing for the SSH
//! connection itself are out of scope; an external transport collaborator
//! drives the [`warden::ServerPolicy`] contract with already-parsed requests.
//!
//! The crate ships one concrete, fully deterministic implementation of the
//! contract, [`warden::StubServer`], intended as a fixture for transport-layer
//! test suites.

pub mod warden;

pub use warden::interface::ServerPolicy;
pub use warden::stub::{StubServer, StubServerBuilder};
