//! Statement batching.
//!
//! Reassembles complete `;`-terminated statements from a line-oriented
//! stream. Blank lines and comment lines (`#`, `--`) never enter a statement
//! and never terminate one, even in the middle of a multi-line statement.

/// Accumulates input lines into complete SQL statements.
#[derive(Debug, Default)]
pub struct StatementBatcher {
    buffer: String,
}

impl StatementBatcher {
    /// Creates an empty batcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one input line; returns a complete statement when the line
    /// terminates one.
    ///
    /// The line's trailing `\n`/`\r\n` is stripped before appending;
    /// everything else is kept verbatim, so multi-line statements keep their
    /// internal line breaks.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let raw = line.trim_end_matches(['\r', '\n']);
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("--") {
            return None;
        }
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(raw);
        if trimmed.ends_with(';') {
            return Some(std::mem::take(&mut self.buffer));
        }
        None
    }

    /// Whether a non-terminated statement is still buffered.
    ///
    /// A remainder left at end of input is discarded, never executed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }
}
