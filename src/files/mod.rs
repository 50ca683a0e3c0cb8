//! Raw capture files: naming and header format.

pub mod filename;
pub mod header;

pub use header::{HeaderError, PaneMetadata, HEADER_END, PANE_START};
