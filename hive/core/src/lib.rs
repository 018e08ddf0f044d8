//! Hive Core - Transcript Reconciliation for Multi-Agent Chat
//!
//! This crate keeps a human's view of an autonomous multi-agent discussion
//! consistent. The Hive backend pushes conversation events over a
//! persistent connection; this engine reconciles them into an ordered
//! transcript, tracks whose turn it is, and gates what the human may send
//! upstream. It is completely independent of any UI framework.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        Frontends                          │
//! │   ┌──────────┐   ┌──────────┐   ┌─────────────────────┐   │
//! │   │   CLI    │   │   GUI    │   │  Headless / Tests   │   │
//! │   └────┬─────┘   └────┬─────┘   └──────────┬──────────┘   │
//! │        └──────────────┴────────────────────┘              │
//! │                       │                                   │
//! │             transcript snapshot (down)                    │
//! │                 submissions (up)                          │
//! └───────────────────────┼───────────────────────────────────┘
//!                         │
//! ┌───────────────────────┼───────────────────────────────────┐
//! │                   HIVE CORE                               │
//! │  ┌────────────────────┴────────────────────────────────┐  │
//! │  │                   HiveClient                        │  │
//! │  │  ┌──────────┐  ┌────────┐  ┌─────────┐  ┌────────┐  │  │
//! │  │  │Transcript│  │  Turn  │  │  Frame  │  │ Trans- │  │  │
//! │  │  │  State   │  │  Gate  │  │ Decoder │  │  port  │  │  │
//! │  │  └──────────┘  └────────┘  └─────────┘  └────────┘  │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`HiveClient`]: the engine facade a frontend drives
//! - [`TranscriptState`]: the reconciler owning the ordered transcript
//! - [`ConversationEvent`]: one decoded server push
//! - [`Phase`]: whose turn the conversation is in
//! - [`ClientConfig`]: endpoint and session parameters
//!
//! # Quick Start
//!
//! ```ignore
//! use hive_core::{ClientConfig, HiveClient};
//! use hive_core::transport::WebSocketTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::load()?;
//!     let transport = WebSocketTransport::new(config.endpoint.clone());
//!     let mut client = HiveClient::new(transport, config);
//!     client.connect().await?;
//!
//!     loop {
//!         // Await the next event, then re-render the snapshot
//!         let _event = client.next_event().await?;
//!         for entry in client.transcript() {
//!             // render entry
//!         }
//!
//!         if client.can_submit() {
//!             // read user input and client.submit(&line).await?
//!         }
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`agents`]: agent identity and the configured roster
//! - [`client`]: the engine facade frontends drive
//! - [`config`]: defaults, TOML file, `HIVE_*` environment overrides
//! - [`phase`]: conversation phase and the turn gate
//! - [`protocol`]: wire shapes and the frame decoder
//! - [`rest`]: client for the synchronous companion API
//! - [`rounds`]: autonomous round estimation
//! - [`transcript`]: the reconciler that owns the transcript
//! - [`transport`]: frame transports (in-process, websocket)
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on any terminal or GUI framework.
//! It's pure reconciliation logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agents;
pub mod client;
pub mod config;
pub mod phase;
pub mod protocol;
pub mod rest;
pub mod rounds;
pub mod transcript;
pub mod transport;

// Re-exports for convenience
pub use agents::{AgentId, AgentProfile, AgentRoster, Speaker};
pub use client::HiveClient;
pub use config::{
    clamp_rounds, default_config_path, ClientConfig, ConfigError, SessionConfig,
    DEFAULT_AUTONOMOUS_ROUNDS, DEFAULT_ENDPOINT, DEFAULT_REST_BASE, DEFAULT_TEMPERATURE,
    MAX_AUTONOMOUS_ROUNDS, MIN_AUTONOMOUS_ROUNDS,
};
pub use phase::{can_submit, is_submittable_text, Phase};
pub use protocol::{decode_frame, ConversationEvent, Submission};
pub use rounds::RoundTracker;
pub use transcript::{
    EntryId, EntryStatus, EntryTag, TranscriptEntry, TranscriptState, DEFAULT_WAITING_PROMPT,
};
pub use transport::{ConnectionId, InProcessTransport, ServerTransport, TransportError};

// REST companion exports
pub use rest::{AgentReply, ChatRound, HistoryEntry, RestClient};

#[cfg(feature = "websocket")]
pub use transport::WebSocketTransport;
