//! Raw log header.
//!
//! A capture file starts with a plain-text header:
//!
//! ```text
//! ===OPLOGGER_PANE_START===
//! type: tmux
//! pane_id: %3
//! ...
//! ===OPLOGGER_PANE_HEADER_END===
//! <raw captured bytes>
//! ```
//!
//! The keys are free-form; [`PaneMetadata`] keeps them in file order and
//! offers accessors for the ones the report knows about.

use std::fs;
use std::io;
use std::path::Path;

/// First line of every header.
pub const PANE_START: &str = "===OPLOGGER_PANE_START===";

/// Last line of every header; raw bytes follow.
pub const HEADER_END: &str = "===OPLOGGER_PANE_HEADER_END===";

pub const KEY_TYPE: &str = "type";
pub const KEY_STARTED: &str = "started";
pub const KEY_CWD: &str = "cwd";
pub const KEY_PANE_ID: &str = "pane_id";
pub const KEY_WINDOW: &str = "window";
pub const KEY_PANE: &str = "pane";

/// Header could not be split from the body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("header start marker without a header end marker")]
    Unterminated,
}

/// Ordered `key: value` metadata from a log header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneMetadata {
    entries: Vec<(String, String)>,
}

impl PaneMetadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self) -> Option<&str> {
        self.non_empty(KEY_TYPE)
    }

    pub fn started(&self) -> Option<&str> {
        self.non_empty(KEY_STARTED)
    }

    pub fn cwd(&self) -> Option<&str> {
        self.non_empty(KEY_CWD)
    }

    pub fn pane_id(&self) -> Option<&str> {
        self.non_empty(KEY_PANE_ID)
    }

    pub fn window(&self) -> Option<&str> {
        self.get(KEY_WINDOW)
    }

    pub fn pane(&self) -> Option<&str> {
        self.get(KEY_PANE)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Render the full header block, sentinels included, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str(PANE_START);
        out.push('\n');
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(HEADER_END);
        out.push('\n');
        out
    }

    /// Create (or truncate) `path` with this header as its only content.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }

    /// Split a raw log into its metadata and captured body.
    ///
    /// A file whose first line is not [`PANE_START`] has no header: the
    /// metadata is empty and the whole input is body. A start marker with no
    /// end marker is an error.
    pub fn split(raw: &[u8]) -> Result<(PaneMetadata, &[u8]), HeaderError> {
        let mut rest = raw;
        let Some(first) = next_line(&mut rest) else {
            return Ok((PaneMetadata::new(), raw));
        };
        if trimmed(first) != PANE_START {
            return Ok((PaneMetadata::new(), raw));
        }

        let mut meta = PaneMetadata::new();
        while let Some(line) = next_line(&mut rest) {
            let line = trimmed(line);
            if line == HEADER_END {
                return Ok((meta, rest));
            }
            if let Some((key, value)) = line.split_once(':') {
                meta.insert(key.trim(), value.trim());
            }
        }
        Err(HeaderError::Unterminated)
    }
}

/// Pop one `\n`-terminated line (terminator excluded) off the front.
fn next_line<'a>(rest: &mut &'a [u8]) -> Option<&'a [u8]> {
    if rest.is_empty() {
        return None;
    }
    match rest.iter().position(|&b| b == b'\n') {
        Some(pos) => {
            let line = &rest[..pos];
            *rest = &rest[pos + 1..];
            Some(line)
        }
        None => {
            let line = *rest;
            *rest = &[];
            Some(line)
        }
    }
}

fn trimmed(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim().to_string()
}
