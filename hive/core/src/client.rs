//! Hive Client - The Engine Facade
//!
//! Ties the pieces together for a frontend: it pulls raw frames from the
//! transport, decodes them, applies them to the transcript, enforces the
//! turn gate on submissions, and encodes outbound frames.
//!
//! # Design Philosophy
//!
//! The client is presentation-agnostic. It doesn't know or care whether a
//! terminal, a GUI, or a test harness sits above it; everything a frontend
//! needs is a transcript snapshot, the phase, and the round estimate.
//!
//! Two consumption styles are supported:
//! - [`poll_events`](HiveClient::poll_events): drain whatever has arrived,
//!   for frontends with their own tick loop
//! - [`next_event`](HiveClient::next_event): await the next decodable
//!   event, for frontends that block on the stream

use crate::agents::AgentRoster;
use crate::config::ClientConfig;
use crate::phase::{can_submit, is_submittable_text, Phase};
use crate::protocol::{decode_frame, ConversationEvent, Submission};
use crate::transcript::{TranscriptEntry, TranscriptState};
use crate::transport::{ServerTransport, TransportError};

/// The client engine, generic over the transport
pub struct HiveClient<T: ServerTransport> {
    /// Configuration
    config: ClientConfig,
    /// Frame transport
    transport: T,
    /// Reconciled conversation state
    state: TranscriptState,
    /// Known agents, for display lookups
    roster: AgentRoster,
    /// Whether the engine believes the connection is up
    connected: bool,
}

impl<T: ServerTransport> HiveClient<T> {
    /// Create a client over the given transport
    #[must_use]
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let roster = AgentRoster::default();
        let state = TranscriptState::new(config.session, roster.rotation());
        Self {
            config,
            transport,
            state,
            roster,
            connected: false,
        }
    }

    /// Replace the default roster
    ///
    /// Also resizes the round-estimate rotation. Call before connecting;
    /// the transcript restarts empty.
    #[must_use]
    pub fn with_roster(mut self, roster: AgentRoster) -> Self {
        self.state = TranscriptState::new(self.config.session, roster.rotation());
        self.roster = roster;
        self
    }

    /// Connect the transport
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails to connect.
    pub async fn connect(&mut self) -> Result<(), TransportError> {
        self.transport.connect().await?;
        self.connected = true;
        Ok(())
    }

    /// Disconnect the transport
    ///
    /// The transcript is preserved; phase and round are cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails to close.
    pub async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.transport.disconnect().await?;
        if self.connected {
            self.state.handle_disconnect();
            self.connected = false;
        }
        Ok(())
    }

    /// Drain every frame that has already arrived and apply it
    ///
    /// Returns the applied events in order, so the caller can render
    /// incrementally. Undecodable frames are dropped by the decoder and
    /// do not appear. A connection close observed during the drain is
    /// applied as the disconnect transition.
    pub fn poll_events(&mut self) -> Vec<ConversationEvent> {
        let mut applied = Vec::new();
        while let Some(frame) = self.transport.try_recv() {
            if let Some(event) = decode_frame(&frame) {
                self.state.apply_event(event.clone());
                applied.push(event);
            }
        }

        if self.connected && !self.transport.is_connected() {
            tracing::info!("Connection lost, ending the discussion");
            self.state.handle_disconnect();
            self.connected = false;
        }

        applied
    }

    /// Wait for the next decodable event and apply it
    ///
    /// Undecodable frames are skipped. Returns the applied event so the
    /// caller can re-render incrementally.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection closes or the transport
    /// fails; the disconnect transition has been applied by then.
    pub async fn next_event(&mut self) -> Result<ConversationEvent, TransportError> {
        loop {
            match self.transport.recv().await {
                Ok(frame) => {
                    if let Some(event) = decode_frame(&frame) {
                        self.state.apply_event(event.clone());
                        return Ok(event);
                    }
                }
                Err(err) => {
                    if self.connected {
                        tracing::info!("Connection lost, ending the discussion");
                        self.state.handle_disconnect();
                        self.connected = false;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Whether a submission would currently pass the turn gate
    #[must_use]
    pub fn can_submit(&self) -> bool {
        can_submit(self.connected, self.state.phase())
    }

    /// Submit a user message
    ///
    /// Re-checks the turn gate at the moment of the call: a stale caller
    /// gets `Ok(false)` and nothing happens. On acceptance the message is
    /// appended locally first, then sent, mirroring the server's own echo
    /// behavior.
    ///
    /// # Errors
    ///
    /// Returns an error only when the transport rejects the send; the
    /// local append has already happened at that point.
    pub async fn submit(&mut self, text: &str) -> Result<bool, TransportError> {
        if !is_submittable_text(text) || !self.can_submit() {
            tracing::debug!(
                phase = ?self.state.phase(),
                connected = self.connected,
                "Submission dropped by turn gate"
            );
            return Ok(false);
        }

        let frame = Submission::new(text, &self.config.session).to_frame()?;
        self.state.apply_user_submission(text);
        self.transport.send(frame).await?;
        Ok(true)
    }

    /// Clear the conversation back to a fresh state
    ///
    /// Local only; the connection stays up.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The ordered transcript
    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.state.entries()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Current round estimate
    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round()
    }

    /// Whether the engine believes the connection is up
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The agent roster
    #[must_use]
    pub fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
