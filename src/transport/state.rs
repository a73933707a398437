//! Transport session state machine.

use serde::{Deserialize, Serialize};

/// Current state of the request/response session.
///
/// `Idle → Sending → AwaitingResult → (Matched | TimedOut | Dead) → Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    #[default]
    Idle,
    Sending,
    AwaitingResult,
    Matched,
    TimedOut,
    Dead,
}

impl TransportState {
    /// True for the states that end a request.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Matched | Self::TimedOut | Self::Dead)
    }
}

/// How a response read ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    /// The prompt line arrived.
    Matched,
    /// The shell stayed silent longer than the read timeout.
    TimedOut,
    /// The output closed or the process exited before a prompt arrived.
    ProcessExited,
}

impl FrameOutcome {
    /// Terminal session state reached by this outcome.
    #[must_use]
    pub fn state(self) -> TransportState {
        match self {
            Self::Matched => TransportState::Matched,
            Self::TimedOut => TransportState::TimedOut,
            Self::ProcessExited => TransportState::Dead,
        }
    }
}

/// Counters over the lifetime of one transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransportStats {
    pub requests: u64,
    pub matched: u64,
    pub timed_out: u64,
    pub exited: u64,
}

impl TransportStats {
    pub(crate) fn record_request(&mut self) {
        self.requests = self.requests.saturating_add(1);
    }

    pub(crate) fn record_outcome(&mut self, outcome: FrameOutcome) {
        let counter = match outcome {
            FrameOutcome::Matched => &mut self.matched,
            FrameOutcome::TimedOut => &mut self.timed_out,
            FrameOutcome::ProcessExited => &mut self.exited,
        };
        *counter = counter.saturating_add(1);
    }
}
