//! Shell PID marker for plain captures.
//!
//! `oplogger start` records the captured shell's PID in the log directory so
//! a separate `oplogger stop` can hang it up. The marker is only a hint: if
//! the shell died without cleanup the PID may since have been reused.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Marker file name inside the log directory.
pub const PID_FILE: &str = ".oplogger.pid";

/// Owns the marker file and removes it when dropped.
#[derive(Debug)]
pub struct PidMarker {
    path: PathBuf,
}

impl PidMarker {
    pub fn write(logs_dir: &Path, pid: libc::pid_t) -> io::Result<Self> {
        let path = logs_dir.join(PID_FILE);
        fs::write(&path, pid.to_string())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidMarker {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("could not remove {:?}: {}", self.path, e);
            }
        }
    }
}

/// PID recorded in `logs_dir`, if any.
pub fn read_pid(logs_dir: &Path) -> Option<libc::pid_t> {
    let content = fs::read_to_string(logs_dir.join(PID_FILE)).ok()?;
    content.trim().parse().ok().filter(|pid| *pid > 0)
}

/// What happened when a hang-up was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hangup {
    Signalled,
    /// No such process; the session already ended.
    AlreadyEnded,
}

/// Send SIGHUP to `pid`.
pub fn hang_up(pid: libc::pid_t) -> io::Result<Hangup> {
    if pid <= 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to signal pid {}", pid),
        ));
    }
    // SAFETY: kill has no memory-safety preconditions; pid > 0 targets one process.
    if unsafe { libc::kill(pid, libc::SIGHUP) } == 0 {
        return Ok(Hangup::Signalled);
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(Hangup::AlreadyEnded)
    } else {
        Err(err)
    }
}
