//! Helper script run by tmux hooks for panes created mid-session.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Helper file name inside the log directory.
pub const HOOK_FILE: &str = ".oplogger_hook.sh";

const TEMPLATE: &str = include_str!("hook.sh");

/// Quote `s` for a POSIX shell.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Script text for `logs_dir`.
pub fn render(logs_dir: &Path) -> String {
    TEMPLATE.replace("{{LOGS_DIR}}", &shell_quote(&logs_dir.to_string_lossy()))
}

/// Write the executable helper into `logs_dir`.
pub fn install(logs_dir: &Path) -> io::Result<PathBuf> {
    let path = logs_dir.join(HOOK_FILE);
    fs::write(&path, render(logs_dir))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Delete the helper; a missing file is fine.
pub fn remove(logs_dir: &Path) -> io::Result<()> {
    match fs::remove_file(logs_dir.join(HOOK_FILE)) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
