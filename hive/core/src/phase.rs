//! Conversation Phase and Turn Gate
//!
//! The phase collapses what the original client tracked as independent
//! booleans (waiting-for-user / agents-discussing) into one mutually
//! exclusive state, so contradictory combinations cannot be represented.
//! Connectivity stays a separate flag owned by the connection adapter;
//! the turn gate combines the two.

use serde::{Deserialize, Serialize};

/// The mutually exclusive conversation state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No conversation in flight
    #[default]
    Idle,
    /// Agents are discussing among themselves
    AgentTurn,
    /// The collective has paused and asked the human to speak
    AwaitingUser,
}

impl Phase {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AgentTurn => "Agents discussing...",
            Self::AwaitingUser => "Your turn",
        }
    }
}

/// Whether the human may submit right now
///
/// Advisory for presentation; the engine re-validates on `submit` and
/// silently no-ops when the gate denies.
#[must_use]
pub fn can_submit(connected: bool, phase: Phase) -> bool {
    connected && matches!(phase, Phase::Idle | Phase::AwaitingUser)
}

/// Whether the candidate text survives trimming
#[must_use]
pub fn is_submittable_text(text: &str) -> bool {
    !text.trim().is_empty()
}
