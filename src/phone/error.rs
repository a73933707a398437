//! Facade error types.

use crate::shell::SpawnError;
use crate::transport::TransportError;

/// Errors surfaced by [`Gnokii`](super::Gnokii) operations.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    /// The shell could not be launched.
    #[error("Failed to launch shell: {0}")]
    Launch(#[from] SpawnError),

    /// The request could not be exchanged with the shell.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The operation has no well-defined command line.
    #[error("{command} is not implemented: {reason}")]
    NotImplemented {
        command: &'static str,
        reason: &'static str,
    },

    /// A parameter was rejected before anything was sent.
    #[error("Invalid argument for {command}: {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },

    /// Side-channel file handling failed (e.g. MMS output file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    pub(crate) fn invalid(command: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command,
            reason: reason.into(),
        }
    }

    /// True if the call failed because no shell is running.
    #[must_use]
    pub fn is_not_running(&self) -> bool {
        matches!(self, Self::Transport(TransportError::NotRunning))
    }
}
