//! Wire Protocol
//!
//! Shapes exchanged with the Hive backend over the persistent connection,
//! and the decoder that turns raw inbound frames into typed
//! [`ConversationEvent`]s. One JSON object per frame in both directions;
//! there is no additional framing.
//!
//! # Decode contract
//!
//! A frame that matches no known shape yields no event. Malformed input is
//! logged at debug level and dropped; it never errors out, because one bad
//! frame on a streaming channel must not end the session.

use serde::{Deserialize, Serialize};

use crate::agents::{AgentId, Speaker};
use crate::config::SessionConfig;

/// A decoded inbound event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationEvent {
    /// An agent started composing a response
    Typing {
        /// The agent that is typing
        agent: AgentId,
    },

    /// An agent delivered its complete response
    Final {
        /// The agent that finished
        agent: AgentId,
        /// The response text
        content: String,
    },

    /// The collective paused and asked the human to speak
    AwaitingUser {
        /// Optional prompt supplied by the server
        message: Option<String>,
    },

    /// An informational message replayed by the server, e.g. a user echo
    PeerEcho {
        /// Who the message is attributed to
        speaker: Speaker,
        /// The message text
        content: String,
    },
}

impl ConversationEvent {
    /// The agent this event concerns, if any
    #[must_use]
    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            Self::Typing { agent } | Self::Final { agent, .. } => Some(agent),
            Self::PeerEcho { speaker, .. } => speaker.agent_id(),
            Self::AwaitingUser { .. } => None,
        }
    }
}

/// Outbound user submission, sent once per user turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// The user's message text
    pub message: String,
    /// Sampling temperature forwarded to the backend
    pub temperature: f32,
    /// Upper bound on autonomous discussion rounds
    pub autonomous_rounds: u8,
}

impl Submission {
    /// Build a submission carrying the session's parameters
    #[must_use]
    pub fn new(message: impl Into<String>, session: &SessionConfig) -> Self {
        Self {
            message: message.into(),
            temperature: session.temperature,
            autonomous_rounds: session.max_autonomous_rounds,
        }
    }

    /// Encode as a single outbound frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Status-tagged frames pushed by the server during a discussion
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StatusFrame {
    Typing {
        agent: String,
    },
    Done {
        agent: String,
        content: String,
    },
    AwaitingUser {
        #[serde(default)]
        message: Option<String>,
    },
}

/// Untagged informational frame, e.g. the server echoing the user's message
#[derive(Debug, Deserialize)]
struct EchoFrame {
    role: String,
    #[serde(default)]
    agent: Option<String>,
    content: String,
}

impl EchoFrame {
    fn into_event(self) -> ConversationEvent {
        ConversationEvent::PeerEcho {
            speaker: Speaker::from_wire(&self.role, self.agent.as_deref()),
            content: self.content,
        }
    }
}

/// Decode one raw inbound frame
///
/// Returns `None` for anything that does not match a known shape.
#[must_use]
pub fn decode_frame(raw: &str) -> Option<ConversationEvent> {
    if let Ok(frame) = serde_json::from_str::<StatusFrame>(raw) {
        return Some(match frame {
            StatusFrame::Typing { agent } => ConversationEvent::Typing {
                agent: AgentId::new(agent),
            },
            StatusFrame::Done { agent, content } => ConversationEvent::Final {
                agent: AgentId::new(agent),
                content,
            },
            StatusFrame::AwaitingUser { message } => ConversationEvent::AwaitingUser { message },
        });
    }

    match serde_json::from_str::<EchoFrame>(raw) {
        Ok(echo) => Some(echo.into_event()),
        Err(err) => {
            tracing::debug!(error = %err, len = raw.len(), "Dropping undecodable frame");
            None
        }
    }
}
