//! Launch error types.

use crate::transport::TransportError;

/// Error type for starting the shell process.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The binary was not found on `PATH` (or at the given path).
    #[error("Shell binary not found: {binary}")]
    NotFound { binary: String },
    /// Permission denied when spawning.
    #[error("Permission denied")]
    PermissionDenied,
    /// A standard stream was not captured at spawn.
    #[error("Child {0} pipe not captured")]
    MissingPipe(&'static str),
    /// The shell started but its greeting could not be read.
    #[error("Failed to read shell greeting: {0}")]
    Greeting(#[from] TransportError),
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    pub(crate) fn from_io(binary: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                binary: binary.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}
