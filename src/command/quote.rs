//! Value quoting and quote-aware splitting of command lines.

/// Separator placed between tokens on the wire.
pub const SEPARATOR: char = ' ';

/// Error returned when a command line cannot be split into tokens.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// A double quote was opened but never closed.
    #[error("Unterminated quote in: {0}")]
    UnterminatedQuote(String),
}

/// Returns true if `value` must be quoted to survive a single-line join.
#[must_use]
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\')
}

/// Quote a value for the command line.
///
/// Values that are safe as bare words are returned unchanged. Anything else
/// is wrapped in double quotes with `"` and `\` backslash-escaped. No other
/// escaping happens: the line goes to a pipe, never through a shell.
#[must_use]
pub fn quote(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Join tokens into a single command line, quoting where needed.
#[must_use]
pub fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut line = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            line.push(SEPARATOR);
        }
        line.push_str(&quote(token.as_ref()));
    }
    line
}

/// Split a command line into tokens.
///
/// Inverse of [`join`]: whitespace separates tokens, double quotes group
/// them, and inside quotes a backslash escapes the next character.
///
/// # Errors
///
/// Returns `SplitError::UnterminatedQuote` if a quote is left open.
pub fn split_line(line: &str) -> Result<Vec<String>, SplitError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => in_quotes = false,
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(SplitError::UnterminatedQuote(line.to_string())),
                },
                _ => current.push(c),
            }
        } else if c == '"' {
            in_quotes = true;
            in_token = true;
        } else if c.is_whitespace() {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
        } else {
            current.push(c);
            in_token = true;
        }
    }

    if in_quotes {
        return Err(SplitError::UnterminatedQuote(line.to_string()));
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}
