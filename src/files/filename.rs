//! Log file naming.
//!
//! Every captured shell or pane gets its own file in the log directory:
//! - plain shell: `terminal_{date}_{time}.log`
//! - tmux pane: `pane_w{window}_p{pane}_{date}_{time}.log`
//!
//! The timestamp is local time, `%Y%m%d_%H%M%S`, so a directory listing
//! sorts files by capture type and then chronologically.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Extension shared by all raw capture files.
pub const LOG_EXTENSION: &str = "log";

/// strftime format used in file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Characters allowed in the window/pane components of a file name.
fn is_safe_component_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Render the timestamp component of a log file name.
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File name for a plain (single shell) capture.
pub fn plain(at: &DateTime<Local>) -> String {
    format!("terminal_{}.{}", timestamp(at), LOG_EXTENSION)
}

/// File name for one tmux pane.
///
/// Window and pane indexes come from tmux and are normally numeric; anything
/// else is reduced to filesystem-safe characters.
pub fn pane(window: &str, pane: &str, at: &DateTime<Local>) -> String {
    format!(
        "pane_w{}_p{}_{}.{}",
        sanitize_component(window),
        sanitize_component(pane),
        timestamp(at),
        LOG_EXTENSION
    )
}

/// Reduce a name component to `[A-Za-z0-9-]`, falling back to `x`.
pub fn sanitize_component(input: &str) -> String {
    let cleaned: String = input.chars().filter(|c| is_safe_component_char(*c)).collect();
    if cleaned.is_empty() {
        "x".to_string()
    } else {
        cleaned
    }
}

/// Whether a path looks like a raw capture file.
pub fn is_log_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext == LOG_EXTENSION)
            .unwrap_or(false)
}

/// List capture files in `dir`, sorted lexicographically by file name.
pub fn list_logs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_log_file(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 2, 6, 10, 0, 5).unwrap()
    }

    #[test]
    fn plain_name_has_timestamp() {
        assert_eq!(plain(&fixed_time()), "terminal_20250206_100005.log");
    }

    #[test]
    fn pane_name_encodes_coordinates() {
        assert_eq!(
            pane("1", "2", &fixed_time()),
            "pane_w1_p2_20250206_100005.log"
        );
    }

    #[test]
    fn pane_name_sanitizes_components() {
        assert_eq!(
            pane("../1", "", &fixed_time()),
            "pane_w1_px_20250206_100005.log"
        );
    }

    #[test]
    fn list_logs_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["pane_w1_p0_x.log", "pane_w0_p1_x.log", "notes.md", ".oplogger.pid"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.log")).unwrap();

        let names: Vec<String> = list_logs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["pane_w0_p1_x.log", "pane_w1_p0_x.log"]);
    }
}
