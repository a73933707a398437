//! Command specification and wire rendering.

use super::flags::OptionalFlag;
use super::quote;

/// Line terminator written after every request.
pub const LINE_TERMINATOR: char = '\n';

/// End-of-text marker closing a multi-line payload.
pub const END_OF_TEXT: char = '\u{3}';

/// Error type for command rendering.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A token would split the single request line.
    #[error("Token for {command} contains a line break: {token:?}")]
    LineBreak { command: String, token: String },
    /// The payload contains the end-of-text marker and would end early.
    #[error("Payload for {command} contains the end-of-text marker")]
    EmbeddedTerminator { command: String },
}

/// An ordered token sequence for one request, with an optional payload.
///
/// Tokens are stored unquoted; quoting happens when the line is rendered.
/// The first token is always the command flag itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    tokens: Vec<String>,
    payload: Option<String>,
}

impl CommandSpec {
    /// Start a command with its flag name, e.g. `--identify`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            tokens: vec![command.into()],
            payload: None,
        }
    }

    /// Build a command from raw tokens (first token is the command).
    ///
    /// Returns `None` for an empty token list.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            tokens,
            payload: None,
        })
    }

    /// Append a required positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.tokens.push(value.to_string());
        self
    }

    /// Append a positional argument only when present.
    #[must_use]
    pub fn opt_arg<T: ToString>(self, value: Option<T>) -> Self {
        match value {
            Some(value) => self.arg(value),
            None => self,
        }
    }

    /// Append a bare switch when `on` holds.
    #[must_use]
    pub fn switch(mut self, flag: &str, on: bool) -> Self {
        if on {
            self.tokens.push(flag.to_string());
        }
        self
    }

    /// Append every present flag from `table`, in table order.
    #[must_use]
    pub fn flags<P>(mut self, table: &[OptionalFlag<P>], params: &P) -> Self {
        for flag in table {
            self.tokens.extend(flag.tokens(params));
        }
        self
    }

    /// Attach a multi-line payload sent after the request line.
    #[must_use]
    pub fn payload(mut self, text: impl Into<String>) -> Self {
        self.payload = Some(text.into());
        self
    }

    /// The command flag (first token).
    #[must_use]
    pub fn command(&self) -> &str {
        &self.tokens[0]
    }

    /// All tokens, command first, unquoted.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The attached payload, if any.
    #[must_use]
    pub fn payload_text(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// The request line without terminator.
    #[must_use]
    pub fn line(&self) -> String {
        quote::join(&self.tokens)
    }

    /// Render the full wire form: request line, terminator, and payload
    /// block (`payload`, newline, end-of-text, newline) when present.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if a token contains a line break or the payload
    /// contains the end-of-text marker.
    pub fn render(&self) -> Result<String, FormatError> {
        if let Some(token) = self.tokens.iter().find(|t| t.contains(['\n', '\r'])) {
            return Err(FormatError::LineBreak {
                command: self.command().to_string(),
                token: token.clone(),
            });
        }

        let mut wire = self.line();
        wire.push(LINE_TERMINATOR);

        if let Some(payload) = &self.payload {
            if payload.contains(END_OF_TEXT) {
                return Err(FormatError::EmbeddedTerminator {
                    command: self.command().to_string(),
                });
            }
            wire.push_str(payload);
            wire.push(LINE_TERMINATOR);
            wire.push(END_OF_TEXT);
            wire.push(LINE_TERMINATOR);
        }

        Ok(wire)
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line())
    }
}
