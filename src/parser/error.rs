//! Per-file parse errors.

use std::path::PathBuf;

use crate::files::HeaderError;

/// A log file that could not be turned into a pane.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed header in {}: {source}", .path.display())]
    Header { path: PathBuf, source: HeaderError },
}

impl ParseError {
    /// The file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } | Self::Header { path, .. } => path,
        }
    }
}
