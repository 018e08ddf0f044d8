//! Round Estimation
//!
//! Heuristic estimate of how far the autonomous discussion has progressed.
//! The server never communicates a round number; the estimate divides the
//! number of typing placeholders created since the last reset by the
//! rotation length, assuming agents speak in fixed rotation. It drifts if
//! they do not, which is an accepted limitation of the observed protocol.

/// Tracks the current discussion round
///
/// Read-only for presentation, never authoritative. Reset to 1 when the
/// user speaks, to 0 when the collective pauses or the conversation ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundTracker {
    /// Placeholders created since the last reset
    pending_since_reset: u32,
    /// Current round estimate
    round: u32,
}

impl RoundTracker {
    /// A tracker in the idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current round estimate
    #[must_use]
    pub fn current(&self) -> u32 {
        self.round
    }

    /// Placeholders counted since the last reset
    #[must_use]
    pub fn pending_since_reset(&self) -> u32 {
        self.pending_since_reset
    }

    /// The user spoke: a fresh discussion round begins
    pub fn note_user_turn(&mut self) {
        self.pending_since_reset = 0;
        self.round = 1;
    }

    /// The collective paused for the human, or the conversation ended
    pub fn reset(&mut self) {
        self.pending_since_reset = 0;
        self.round = 0;
    }

    /// A new typing placeholder appeared; recompute the estimate
    ///
    /// The placeholder that triggered the call is included in the count.
    pub fn note_placeholder(&mut self, rotation: usize, max_rounds: u8) {
        self.pending_since_reset += 1;
        let rotation = u32::try_from(rotation.max(1)).unwrap_or(1);
        let estimate = self.pending_since_reset / rotation + 1;
        self.round = estimate.clamp(1, u32::from(max_rounds.max(1)));
    }
}
