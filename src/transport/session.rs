//! Half-duplex request/response exchange over the shell's pipes.

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::TransportError;
use super::framing::FrameScanner;
use super::state::{FrameOutcome, TransportState, TransportStats};
use crate::command::CommandSpec;

/// Bytes requested per read.
const READ_CHUNK: usize = 4096;

/// Default prompt printed by `gnokii --shell`.
pub const DEFAULT_PROMPT: &str = "gnokii> ";

/// Reports whether the process behind a transport is still running.
///
/// Implementations must not block.
pub trait Liveness {
    fn is_alive(&mut self) -> bool;
}

impl Liveness for tokio::process::Child {
    fn is_alive(&mut self) -> bool {
        matches!(self.try_wait(), Ok(None))
    }
}

/// Framing and timing parameters for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSettings {
    /// Prompt marker that ends every response.
    pub prompt: String,
    /// Longest silence tolerated while awaiting a response.
    pub read_timeout: Duration,
    /// Wait between polls when no output is available.
    pub poll_interval: Duration,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            read_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// One framed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Payload between the echoed command and the prompt.
    pub text: String,
    /// How the read ended.
    pub outcome: FrameOutcome,
    /// Raw bytes read for this response.
    pub bytes: usize,
}

impl Response {
    /// True if the response ended with the prompt line.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == FrameOutcome::Matched
    }

    /// True if the shell went silent before the prompt arrived.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.outcome == FrameOutcome::TimedOut
    }

    /// Consume the response, keeping the payload text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Request/response framing over a reader/writer pair.
///
/// Only one request may be outstanding at a time; `&mut self` on
/// [`send`](Self::send) enforces that for a single owner. If a `send` future
/// is dropped mid-read, the transport stays out of `Idle` and refuses further
/// requests with [`TransportError::InFlight`].
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
    settings: FrameSettings,
    state: TransportState,
    stats: TransportStats,
}

impl<R, W> FramedTransport<R, W> {
    /// Wrap a reader (process output) and writer (process input).
    #[must_use]
    pub fn new(reader: R, writer: W, settings: FrameSettings) -> Self {
        Self {
            reader,
            writer,
            settings,
            state: TransportState::Idle,
            stats: TransportStats::default(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &FrameSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> TransportState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    /// Give back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn transition(&mut self, new_state: TransportState) {
        tracing::debug!(from = ?self.state, to = ?new_state, "State transition");
        self.state = new_state;
    }
}

impl<R, W> std::fmt::Debug for FramedTransport<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedTransport")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<R, W> FramedTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Write one command and wait for its framed response.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotRunning` if `liveness` reports the process
    /// dead, `InFlight` if a previous request never finished, `Format` if
    /// the command cannot be rendered, and `Io` on any pipe failure. A
    /// timeout is not an error.
    pub async fn send<L: Liveness>(
        &mut self,
        command: &CommandSpec,
        liveness: &mut L,
    ) -> Result<Response, TransportError> {
        if !liveness.is_alive() {
            return Err(TransportError::NotRunning);
        }
        if self.state != TransportState::Idle {
            return Err(TransportError::InFlight(self.state));
        }

        let wire = command.render()?;
        let line = command.line();
        tracing::debug!(command = %line, "Sending command");

        self.stats.record_request();
        self.transition(TransportState::Sending);
        if let Err(e) = self.write_wire(&wire).await {
            self.transition(TransportState::Idle);
            return Err(e.into());
        }

        self.read_frame(Some(&line), liveness).await
    }

    /// Wait for a framed response without sending anything first.
    ///
    /// Used to consume the shell's greeting after launch.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InFlight` if a request is outstanding and
    /// `Io` on read failures.
    pub async fn get_result<L: Liveness>(
        &mut self,
        liveness: &mut L,
    ) -> Result<Response, TransportError> {
        if self.state != TransportState::Idle {
            return Err(TransportError::InFlight(self.state));
        }
        self.read_frame(None, liveness).await
    }

    async fn write_wire(&mut self, wire: &str) -> std::io::Result<()> {
        self.writer.write_all(wire.as_bytes()).await?;
        self.writer.flush().await
    }

    async fn read_frame<L: Liveness>(
        &mut self,
        echo: Option<&str>,
        liveness: &mut L,
    ) -> Result<Response, TransportError> {
        let mut scanner = FrameScanner::new(self.settings.prompt.clone());
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut last_data = Instant::now();
        self.transition(TransportState::AwaitingResult);

        let outcome = loop {
            let poll = self.settings.poll_interval;
            match tokio::time::timeout(poll, self.reader.read(&mut chunk)).await {
                Ok(Ok(0)) => break FrameOutcome::ProcessExited,
                Ok(Ok(n)) => {
                    last_data = Instant::now();
                    tracing::trace!(bytes = n, "Read shell output");
                    if scanner.push(&chunk[..n]) {
                        break FrameOutcome::Matched;
                    }
                    continue;
                }
                Ok(Err(e)) if is_would_block(&e) => tokio::time::sleep(poll).await,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Shell output read failed");
                    self.transition(TransportState::Idle);
                    return Err(e.into());
                }
                // Nothing arrived within the poll interval.
                Err(_) => {}
            }

            if !liveness.is_alive() {
                if let Err(e) = self.drain(&mut scanner, &mut chunk).await {
                    self.transition(TransportState::Idle);
                    return Err(e.into());
                }
                if scanner.is_framed() {
                    break FrameOutcome::Matched;
                }
                break FrameOutcome::ProcessExited;
            }

            if last_data.elapsed() >= self.settings.read_timeout {
                break FrameOutcome::TimedOut;
            }
        };

        match outcome {
            FrameOutcome::Matched => {}
            FrameOutcome::TimedOut => tracing::warn!(
                timeout = ?self.settings.read_timeout,
                bytes = scanner.len(),
                "Shell went silent before the prompt"
            ),
            FrameOutcome::ProcessExited => tracing::warn!(
                bytes = scanner.len(),
                "Shell output closed before the prompt"
            ),
        }

        let response = Response {
            text: scanner.payload(echo),
            outcome,
            bytes: scanner.len(),
        };
        self.stats.record_outcome(outcome);
        self.transition(outcome.state());
        self.transition(TransportState::Idle);
        Ok(response)
    }

    /// Collect whatever output is still buffered after the process died.
    async fn drain(&mut self, scanner: &mut FrameScanner, chunk: &mut [u8]) -> std::io::Result<()> {
        loop {
            let poll = self.settings.poll_interval;
            match tokio::time::timeout(poll, self.reader.read(chunk)).await {
                Ok(Ok(0)) | Err(_) => return Ok(()),
                Ok(Ok(n)) => {
                    scanner.push(&chunk[..n]);
                }
                Ok(Err(e)) if is_would_block(&e) => return Ok(()),
                Ok(Err(e)) => return Err(e),
            }
        }
    }
}

/// "No data yet" conditions, as opposed to real pipe failures.
fn is_would_block(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted)
}
