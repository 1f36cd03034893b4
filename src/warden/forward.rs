//! Remote port-forward registry.
//!
//! Handles `tcpip-forward` / `cancel-tcpip-forward` global requests. Each
//! granted request binds an ephemeral listener on loopback and stores it
//! keyed by the (address, port) pair the client asked about; the bound port
//! is returned for the transport to relay back to the client.
//!
//! The listener is a scoped resource: acquired in [`PortForwardRegistry::request`],
//! released exactly once in [`PortForwardRegistry::cancel`]. The registry
//! never holds two live listeners for the same key. Nothing here releases
//! listeners on session teardown beyond normal `Drop` of the owning
//! instance; an external lifecycle manager closes outstanding forwards when
//! a session ends.
//!
//! # Feature Gate
//!
//! This module is only compiled when the `port_forward` feature is enabled.

use std::collections::HashMap;

use tokio::net::TcpListener;
use tracing::debug;

use super::error::{Result, WardenError};

/// Live forward listeners for one session, keyed by (address, port).
#[derive(Debug, Default)]
pub struct PortForwardRegistry {
    listeners: HashMap<(String, u32), TcpListener>,
}

impl PortForwardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an ephemeral loopback listener for a forward request and return
    /// the bound port. A request for a key that already has a live listener
    /// is rejected.
    pub async fn request(&mut self, address: &str, port: u32) -> Result<u16> {
        let key = (address.to_string(), port);
        if self.listeners.contains_key(&key) {
            return Err(WardenError::ForwardInUse {
                address: address.to_string(),
                port,
            });
        }

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let bound_port = listener.local_addr()?.port();
        debug!(
            "Forward listener for {}:{} bound on 127.0.0.1:{}",
            address, port, bound_port
        );
        self.listeners.insert(key, listener);
        Ok(bound_port)
    }

    /// Close and remove the listener for a key. Cancelling a key with no
    /// live listener is an error.
    pub fn cancel(&mut self, address: &str, port: u32) -> Result<()> {
        match self.listeners.remove(&(address.to_string(), port)) {
            Some(listener) => {
                // Dropping the listener closes the socket
                drop(listener);
                debug!("Forward listener for {}:{} released", address, port);
                Ok(())
            }
            None => Err(WardenError::ForwardNotFound {
                address: address.to_string(),
                port,
            }),
        }
    }

    /// Whether a live listener exists for the key.
    pub fn is_active(&self, address: &str, port: u32) -> bool {
        self.listeners.contains_key(&(address.to_string(), port))
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_returns_nonzero_port() {
        let mut registry = PortForwardRegistry::new();
        let port = registry.request("", 2222).await.unwrap();
        assert_ne!(port, 0);
        assert!(registry.is_active("", 2222));
    }

    #[tokio::test]
    async fn test_cancel_releases_the_listener() {
        let mut registry = PortForwardRegistry::new();
        registry.request("localhost", 2222).await.unwrap();

        registry.cancel("localhost", 2222).unwrap();
        assert!(!registry.is_active("localhost", 2222));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_request_is_rejected() {
        let mut registry = PortForwardRegistry::new();
        registry.request("localhost", 2222).await.unwrap();

        let result = registry.request("localhost", 2222).await;
        assert!(matches!(result, Err(WardenError::ForwardInUse { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_re_request_after_cancel_succeeds() {
        let mut registry = PortForwardRegistry::new();
        registry.request("localhost", 2222).await.unwrap();
        registry.cancel("localhost", 2222).unwrap();

        let port = registry.request("localhost", 2222).await.unwrap();
        assert_ne!(port, 0);
    }

    #[tokio::test]
    async fn test_cancel_of_unknown_key_is_an_error() {
        let mut registry = PortForwardRegistry::new();
        let result = registry.cancel("localhost", 2222);
        assert!(matches!(result, Err(WardenError::ForwardNotFound { .. })));
    }

    #[tokio::test]
    async fn test_distinct_keys_coexist() {
        let mut registry = PortForwardRegistry::new();
        let a = registry.request("localhost", 2222).await.unwrap();
        let b = registry.request("localhost", 2223).await.unwrap();
        let c = registry.request("0.0.0.0", 2222).await.unwrap();

        assert_eq!(registry.len(), 3);
        // Ephemeral binds on the same host never collide
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_bound_port_accepts_connections() {
        let mut registry = PortForwardRegistry::new();
        let port = registry.request("localhost", 2222).await.unwrap();

        let stream = tokio::net::TcpStream::connect(("127.0.0.1", port)).await;
        assert!(stream.is_ok());
    }
}
