//! Line-oriented batch driver.
//!
//! Reads one shell command per line, sends each through a [`Gnokii`] and
//! writes the response text (or a JSON record) per command. Blank lines and
//! `#` comments are skipped. The first error stops the batch.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::{split_line, CommandSpec, SplitError};
use crate::phone::{Gnokii, ShellError};
use crate::transport::FrameOutcome;

/// Errors that abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Line {line}: {source}")]
    Parse { line: usize, source: SplitError },

    #[error("Line {line}: {source}")]
    Shell { line: usize, source: ShellError },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How responses are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Response text followed by a newline.
    #[default]
    Text,
    /// One JSON object per command.
    JsonLines,
}

/// One JSON output line.
#[derive(Debug, Serialize)]
pub struct BatchRecord<'a> {
    pub command: &'a str,
    pub outcome: FrameOutcome,
    pub text: &'a str,
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub commands: usize,
    pub incomplete: usize,
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines and comments. A first word without a
/// leading dash gets `--` prepended, so `version` and `--version` are the
/// same command.
///
/// # Errors
///
/// Returns `SplitError` for an unterminated quote.
pub fn parse_line(line: &str) -> Result<Option<CommandSpec>, SplitError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    Ok(command_from_tokens(split_line(trimmed)?))
}

/// Build a command from already split words, prefixing `--` to a first
/// word that has no leading dash. Returns `None` for no words.
#[must_use]
pub fn command_from_tokens(mut tokens: Vec<String>) -> Option<CommandSpec> {
    if let Some(first) = tokens.first_mut() {
        if !first.starts_with('-') {
            first.insert_str(0, "--");
        }
    }
    CommandSpec::from_tokens(tokens)
}

/// Run every command read from `input`, writing responses to `output`.
///
/// # Errors
///
/// Returns `BatchError` for the first line that cannot be parsed or sent,
/// or when reading input or writing output fails.
pub async fn run_batch<R, W>(
    phone: &mut Gnokii,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<BatchSummary, BatchError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = BatchSummary::default();
    let mut lines = input.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let Some(command) =
            parse_line(&line).map_err(|source| BatchError::Parse { line: line_no, source })?
        else {
            continue;
        };

        let response = phone
            .send(&command)
            .await
            .map_err(|source| BatchError::Shell { line: line_no, source })?;

        summary.commands += 1;
        if !response.is_complete() {
            summary.incomplete += 1;
            tracing::warn!(
                line = line_no,
                command = %command,
                outcome = ?response.outcome,
                "Incomplete response"
            );
        }

        let mut rendered = match format {
            OutputFormat::Text => response.text,
            OutputFormat::JsonLines => serde_json::to_string(&BatchRecord {
                command: &command.line(),
                outcome: response.outcome,
                text: &response.text,
            })?,
        };
        rendered.push('\n');
        output.write_all(rendered.as_bytes()).await?;
    }

    output.flush().await?;
    tracing::info!(
        commands = summary.commands,
        incomplete = summary.incomplete,
        "Batch finished"
    );
    Ok(summary)
}
