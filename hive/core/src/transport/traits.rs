//! Transport Traits
//!
//! Core trait definition for the client side of the conversation stream.
//! A transport moves opaque text frames and tracks connection state;
//! decoding is the engine's job, so every transport behaves identically
//! with respect to malformed input.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Unique identifier for one connection attempt
///
/// Used in log lines to correlate frames with the connection that carried
/// them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Generate a new unique connection ID from a random 128-bit value
    #[must_use]
    pub fn new() -> Self {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().gen();
        Self(format!("conn_{}", hex::encode(bytes)))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the server failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection was closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Failed to send a frame
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Failed to receive a frame
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Outbound frame could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport not in expected state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error from the underlying transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport trait for the client side of the conversation stream
///
/// Implementations handle the specific transport mechanism; payloads are
/// raw text frames in both directions.
#[async_trait]
pub trait ServerTransport: Send + Sync {
    /// Connect to the server
    ///
    /// For the in-process transport this is a no-op. For the websocket
    /// transport this performs the handshake and spawns the pump tasks.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Gracefully close the connection
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Send a frame to the server
    async fn send(&self, frame: String) -> Result<(), TransportError>;

    /// Receive a frame (blocks until one is available)
    async fn recv(&mut self) -> Result<String, TransportError>;

    /// Try to receive a frame (non-blocking)
    ///
    /// Returns `None` when no frame is waiting. A closed connection also
    /// returns `None` and flips [`is_connected`](Self::is_connected), which
    /// is how polling callers observe the close.
    fn try_recv(&mut self) -> Option<String>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;
}
