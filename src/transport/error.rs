//! Transport error types.

use crate::command::FormatError;

/// Errors raised while exchanging a request with the shell.
///
/// A silent shell is not an error: timeouts come back as a
/// [`FrameOutcome::TimedOut`](super::FrameOutcome::TimedOut) response.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// No live shell process to talk to.
    #[error("Shell process is not running")]
    NotRunning,

    /// A previous request never completed (its future was dropped), so the
    /// output stream is out of step with requests.
    #[error("A request is already in flight (state: {0:?})")]
    InFlight(super::TransportState),

    /// The command could not be rendered to a single request.
    #[error("Invalid command: {0}")]
    Format(#[from] FormatError),

    /// Reading or writing the pipes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
