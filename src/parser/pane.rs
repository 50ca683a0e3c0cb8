//! One parsed log file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ToolAllowlist;
use crate::files::PaneMetadata;
use crate::terminal::RenderPipeline;

use super::block::{segment, Block};
use super::error::ParseError;

/// A log file reduced to its metadata and command blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPane {
    pub path: PathBuf,
    pub metadata: PaneMetadata,
    pub blocks: Vec<Block>,
}

impl ParsedPane {
    /// Read and parse one log file.
    pub fn from_file(path: &Path, tools: &ToolAllowlist) -> Result<Self, ParseError> {
        let raw = fs::read(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &raw, tools)
    }

    /// Parse raw log bytes as if read from `path`.
    pub fn from_bytes(path: &Path, raw: &[u8], tools: &ToolAllowlist) -> Result<Self, ParseError> {
        let (metadata, body) = PaneMetadata::split(raw).map_err(|source| ParseError::Header {
            path: path.to_path_buf(),
            source,
        })?;

        let lines = RenderPipeline::render_all(body);
        let start = lines
            .iter()
            .position(|l| !l.trim().is_empty())
            .unwrap_or(lines.len());
        let end = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(start, |i| i + 1);

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            blocks: segment(&lines[start..end], tools),
        })
    }

    /// Display label: tmux coordinates, else the file stem in title case.
    pub fn label(&self) -> String {
        if let (Some(window), Some(pane)) = (self.metadata.window(), self.metadata.pane()) {
            return format!("Window {} — Pane {}", window, pane);
        }

        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().replace('_', " "))
            .unwrap_or_default();
        let title = title_case(&stem);
        if title.starts_with("Terminal") {
            "Terminal Session".to_string()
        } else {
            title
        }
    }

    /// Blocks that carry a command.
    pub fn commands(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.command_text().is_some())
    }

    pub fn command_count(&self) -> usize {
        self.commands().count()
    }

    pub fn tool_count(&self) -> usize {
        self.commands().filter(|b| b.is_tool).count()
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, raw: &[u8]) -> ParsedPane {
        ParsedPane::from_bytes(Path::new(name), raw, &ToolAllowlist::default()).unwrap()
    }

    #[test]
    fn parses_header_and_blocks() {
        let raw = b"===OPLOGGER_PANE_START===\n\
                    type: tmux\n\
                    window: 0\n\
                    pane: 1\n\
                    ===OPLOGGER_PANE_HEADER_END===\n\
                    \x1b[32muser@host\x1b[0m:~$ nmap 10.0.0.1\r\n\
                    22/tcp open ssh\r\n";
        let pane = parse("pane_w0_p1_20250206_101500.log", raw);

        assert_eq!(pane.metadata.kind(), Some("tmux"));
        assert_eq!(pane.label(), "Window 0 — Pane 1");
        assert_eq!(pane.blocks.len(), 1);
        assert_eq!(pane.blocks[0].command.as_deref(), Some("nmap 10.0.0.1"));
        assert_eq!(pane.blocks[0].output, "22/tcp open ssh");
        assert!(pane.blocks[0].is_tool);
        assert_eq!(pane.tool_count(), 1);
    }

    #[test]
    fn file_without_header_is_all_body() {
        let pane = parse("notes.log", b"$ id\nuid=0(root)\n");
        assert!(pane.metadata.is_empty());
        assert_eq!(pane.command_count(), 1);
    }

    #[test]
    fn unterminated_header_is_an_error() {
        let err = ParsedPane::from_bytes(
            Path::new("bad.log"),
            b"===OPLOGGER_PANE_START===\ntype: plain\n$ ls\n",
            &ToolAllowlist::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Header { .. }));
        assert_eq!(err.path(), Path::new("bad.log"));
    }

    #[test]
    fn leading_and_trailing_blank_lines_are_trimmed() {
        let pane = parse("t.log", b"\n\n   \nhello\n$ ls\n\n\n");
        assert_eq!(pane.blocks.len(), 2);
        assert_eq!(pane.blocks[0].output, "hello");
    }

    #[test]
    fn empty_body_has_no_blocks() {
        let pane = parse(
            "terminal_20250206_101500.log",
            b"===OPLOGGER_PANE_START===\n===OPLOGGER_PANE_HEADER_END===\n",
        );
        assert!(pane.blocks.is_empty());
    }

    #[test]
    fn plain_capture_label() {
        let pane = parse("terminal_20250206_101500.log", b"");
        assert_eq!(pane.label(), "Terminal Session");
    }

    #[test]
    fn other_files_use_title_cased_stem() {
        let pane = parse("box_scan_notes.log", b"");
        assert_eq!(pane.label(), "Box Scan Notes");
    }

    #[test]
    fn title_case_treats_digits_as_boundaries() {
        assert_eq!(title_case("pane w0 p1abc"), "Pane W0 P1Abc");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParsedPane::from_file(&dir.path().join("gone.log"), &ToolAllowlist::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::Read { .. }));
    }
}
