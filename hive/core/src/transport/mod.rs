//! Transport Layer for the Conversation Stream
//!
//! Provides abstraction over how raw text frames reach the engine:
//! - `InProcess`: direct channel communication (tests, embedded use)
//! - WebSocket: the production path (behind the `websocket` feature)
//!
//! # Design Philosophy
//!
//! A transport moves opaque frames and tracks connection state, nothing
//! more. Decoding lives with the engine, so malformed input is handled
//! identically no matter which transport carried it, and the whole engine
//! can be exercised in-process without a server.

pub mod in_process;
pub mod traits;
#[cfg(feature = "websocket")]
pub mod websocket;

// Re-exports for convenience
pub use in_process::InProcessTransport;
pub use traits::{ConnectionId, ServerTransport, TransportError};

#[cfg(feature = "websocket")]
pub use websocket::WebSocketTransport;
