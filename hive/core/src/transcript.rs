//! Transcript Reconciliation
//!
//! The core state machine. Applies decoded [`ConversationEvent`]s to an
//! ordered transcript plus the conversation [`Phase`], one event at a time,
//! in arrival order. Events are never reordered, batched, retried, or
//! replayed.
//!
//! # Design Philosophy
//!
//! Server pushes are optimistic and may duplicate or arrive without their
//! usual predecessors (a `done` without a `typing`, a second `typing` for
//! the same agent). Every transition is therefore written to be idempotent
//! or self-correcting: the worst case for a misbehaving stream is a dropped
//! or duplicated entry, never an inconsistent transcript.
//!
//! Placeholder promotion is O(1): a side index maps each agent to the
//! position of its Pending entry. The index is empty whenever the phase is
//! `AwaitingUser` (stale placeholders are finalized on that transition), and
//! entry removal only happens in that phase, so stored positions never
//! dangle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agents::{AgentId, Speaker};
use crate::config::SessionConfig;
use crate::phase::Phase;
use crate::protocol::ConversationEvent;
use crate::rounds::RoundTracker;

/// Prompt shown when the server pauses without supplying one
pub const DEFAULT_WAITING_PROMPT: &str = "The agents are waiting for your input...";

/// Insertion-order identifier of a transcript entry
///
/// Monotonic within a conversation; reset only by [`TranscriptState::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a transcript entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Placeholder awaiting content
    Pending,
    /// Completed message
    Final,
}

/// Marker distinguishing ordinary entries from waiting notices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryTag {
    /// Ordinary conversation entry
    #[default]
    None,
    /// Pause notice, dropped when the user speaks
    Waiting,
}

/// One entry of the reconciled transcript
///
/// Owned exclusively by the reconciler. Presentation reads snapshots and
/// never mutates; the only in-place mutation the reconciler itself performs
/// is Pending to Final promotion, which preserves the entry's position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Insertion-order id
    pub id: EntryId,
    /// Who authored the entry
    pub speaker: Speaker,
    /// Message text; absent while Pending
    pub content: Option<String>,
    /// Lifecycle status
    pub status: EntryStatus,
    /// Waiting-notice marker
    pub tag: EntryTag,
    /// When the entry was created (Unix timestamp ms)
    pub timestamp: u64,
}

impl TranscriptEntry {
    /// Whether this entry is still a placeholder
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    /// Whether this entry is a pause notice
    #[must_use]
    pub fn is_waiting_notice(&self) -> bool {
        self.tag == EntryTag::Waiting
    }
}

/// The reconciled conversation state
///
/// Single-threaded by construction: exactly one caller applies events and
/// submissions, so no locking is needed or used.
#[derive(Debug)]
pub struct TranscriptState {
    /// Ordered transcript
    entries: Vec<TranscriptEntry>,
    /// Position of each agent's Pending entry in `entries`
    pending: HashMap<AgentId, usize>,
    /// Next entry id to allocate
    next_id: u64,
    /// Conversation phase
    phase: Phase,
    /// Round estimate
    rounds: RoundTracker,
    /// Session parameters (round clamp)
    session: SessionConfig,
    /// Rotation length for the round estimate
    rotation: usize,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new(SessionConfig::default(), 3)
    }
}

impl TranscriptState {
    /// Create a reconciler with the given session parameters and rotation
    /// length (normally the roster size)
    #[must_use]
    pub fn new(session: SessionConfig, rotation: usize) -> Self {
        Self {
            entries: Vec::new(),
            pending: HashMap::new(),
            next_id: 0,
            phase: Phase::Idle,
            rounds: RoundTracker::new(),
            session,
            rotation: rotation.max(1),
        }
    }

    /// Apply one decoded event
    pub fn apply_event(&mut self, event: ConversationEvent) {
        match event {
            ConversationEvent::Typing { agent } => self.apply_typing(agent),
            ConversationEvent::Final { agent, content } => self.apply_final(agent, content),
            ConversationEvent::AwaitingUser { message } => self.apply_awaiting_user(message),
            ConversationEvent::PeerEcho { speaker, content } => {
                self.apply_peer_echo(speaker, content);
            }
        }
    }

    /// Apply a local user submission
    ///
    /// Identical transcript effect to a user echo from the server. Gate
    /// checks happen in the caller; by the time this runs the submission is
    /// accepted.
    pub fn apply_user_submission(&mut self, text: impl Into<String>) {
        self.append_user_turn(text.into());
    }

    /// The connection closed or errored: the discussion ends, history stays
    pub fn handle_disconnect(&mut self) {
        self.finalize_stale_pending();
        self.phase = Phase::Idle;
        self.rounds.reset();
    }

    /// Clear everything back to a fresh conversation
    pub fn reset(&mut self) {
        self.entries.clear();
        self.pending.clear();
        self.next_id = 0;
        self.phase = Phase::Idle;
        self.rounds.reset();
    }

    /// The ordered transcript
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round estimate
    #[must_use]
    pub fn round(&self) -> u32 {
        self.rounds.current()
    }

    /// Number of transcript entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of outstanding placeholders
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn apply_typing(&mut self, agent: AgentId) {
        if self.pending.contains_key(&agent) {
            tracing::debug!(agent = %agent, "Duplicate typing signal ignored");
            return;
        }

        let position = self.entries.len();
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry {
            id,
            speaker: Speaker::Agent(agent.clone()),
            content: None,
            status: EntryStatus::Pending,
            tag: EntryTag::None,
            timestamp: now_ms(),
        });
        self.pending.insert(agent, position);
        self.phase = Phase::AgentTurn;
        self.rounds
            .note_placeholder(self.rotation, self.session.max_autonomous_rounds);
    }

    fn apply_final(&mut self, agent: AgentId, content: String) {
        if let Some(position) = self.pending.remove(&agent) {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.status = EntryStatus::Final;
                entry.content = Some(content);
                return;
            }
        }

        // Response delivered without a preceding typing signal
        tracing::debug!(agent = %agent, "Response without placeholder, appending");
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry {
            id,
            speaker: Speaker::Agent(agent),
            content: Some(content),
            status: EntryStatus::Final,
            tag: EntryTag::None,
            timestamp: now_ms(),
        });
    }

    fn apply_awaiting_user(&mut self, message: Option<String>) {
        self.finalize_stale_pending();

        let content = message.unwrap_or_else(|| DEFAULT_WAITING_PROMPT.to_string());
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry {
            id,
            speaker: Speaker::System,
            content: Some(content),
            status: EntryStatus::Final,
            tag: EntryTag::Waiting,
            timestamp: now_ms(),
        });
        self.phase = Phase::AwaitingUser;
        self.rounds.reset();
    }

    fn apply_peer_echo(&mut self, speaker: Speaker, content: String) {
        if speaker == Speaker::User {
            self.append_user_turn(content);
            return;
        }

        // Informational: append without touching phase or round
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry {
            id,
            speaker,
            content: Some(content),
            status: EntryStatus::Final,
            tag: EntryTag::None,
            timestamp: now_ms(),
        });
    }

    fn append_user_turn(&mut self, content: String) {
        if self.phase == Phase::AwaitingUser {
            self.drop_waiting_notices();
        }

        let id = self.allocate_id();
        self.entries.push(TranscriptEntry {
            id,
            speaker: Speaker::User,
            content: Some(content),
            status: EntryStatus::Final,
            tag: EntryTag::None,
            timestamp: now_ms(),
        });
        self.phase = Phase::AgentTurn;
        self.rounds.note_user_turn();
    }

    /// Promote outstanding placeholders to Final with absent content
    ///
    /// Runs on every transition that exits `AgentTurn` other than the
    /// agent's own completion, so placeholders never dangle across phases.
    fn finalize_stale_pending(&mut self) {
        for (agent, position) in self.pending.drain() {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.status = EntryStatus::Final;
                tracing::debug!(agent = %agent, "Finalized stale placeholder");
            }
        }
    }

    // Only reachable in AwaitingUser, where the pending index is empty, so
    // the removal cannot invalidate stored positions.
    fn drop_waiting_notices(&mut self) {
        self.entries.retain(|entry| entry.tag != EntryTag::Waiting);
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Get current timestamp in milliseconds
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
