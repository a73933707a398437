//! Incremental prompt framing.
//!
//! The shell answers each request with free text followed by a line that
//! holds nothing but its prompt. [`FrameScanner`] accumulates output chunks
//! as they arrive, tracking line boundaries incrementally, and reports when
//! the buffer ends in such a prompt line. Chunks may split lines (or UTF-8
//! sequences) anywhere; text is only decoded when the payload is extracted.

use std::ops::Range;

/// Accumulates one pending response and detects its terminating prompt.
#[derive(Debug, Clone)]
pub struct FrameScanner {
    prompt: String,
    buf: Vec<u8>,
    /// Start of the line currently being filled.
    line_start: usize,
    /// Last completed line that is not blank.
    last_line: Option<Range<usize>>,
}

impl FrameScanner {
    /// Create a scanner for the given prompt marker (e.g. `"gnokii> "`).
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            buf: Vec::new(),
            line_start: 0,
            last_line: None,
        }
    }

    /// Append a chunk of output. Returns true once the buffer is framed.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        let from = self.buf.len();
        self.buf.extend_from_slice(chunk);

        for i in from..self.buf.len() {
            if self.buf[i] == b'\n' {
                if !is_blank(&self.buf[self.line_start..i]) {
                    self.last_line = Some(self.line_start..i);
                }
                self.line_start = i + 1;
            }
        }

        self.is_framed()
    }

    /// True if the accumulated output ends in a prompt line.
    #[must_use]
    pub fn is_framed(&self) -> bool {
        self.prompt_span().is_some()
    }

    /// Number of bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extract the response payload.
    ///
    /// Takes everything before the prompt line (or the whole buffer when no
    /// prompt arrived), drops lines that begin with the prompt marker and a
    /// leading line equal to `echo`, and strips trailing line breaks.
    #[must_use]
    pub fn payload(&self, echo: Option<&str>) -> String {
        let end = self.prompt_span().map_or(self.buf.len(), |span| span.start);
        let text = String::from_utf8_lossy(&self.buf[..end]);
        let marker = self.prompt.trim_end();

        let mut lines: Vec<&str> = text
            .lines()
            .filter(|line| marker.is_empty() || !line.starts_with(marker))
            .collect();

        if let (Some(echo), Some(first)) = (echo, lines.first()) {
            if first.trim() == echo.trim() {
                lines.remove(0);
            }
        }

        lines.join("\n").trim_end_matches(['\n', '\r']).to_string()
    }

    /// Locate the terminating prompt line, if the buffer ends in one.
    fn prompt_span(&self) -> Option<Range<usize>> {
        let tail = self.line_start..self.buf.len();
        if !is_blank(&self.buf[tail.clone()]) {
            return self.is_prompt(&self.buf[tail.clone()], false).then_some(tail);
        }
        let last = self.last_line.clone()?;
        self.is_prompt(&self.buf[last.clone()], true).then_some(last)
    }

    fn is_prompt(&self, line: &[u8], completed: bool) -> bool {
        let marker = self.prompt.trim_end().as_bytes();
        if marker.is_empty() {
            return false;
        }
        // An unfinished line must carry the prompt's trailing whitespace too,
        // otherwise it would be left behind for the next response.
        trim_end(line) == marker && (completed || line.len() >= self.prompt.len())
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}
