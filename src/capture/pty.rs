//! Plain capture: the user's shell inside a pseudo-terminal.
//!
//! `oplogger start` outside tmux forks the shell onto a new PTY and sits
//! between it and the real terminal. Keystrokes go to the shell untouched,
//! shell output goes to the screen untouched, and a rendered copy of the
//! output (escapes stripped, redraws applied) is appended to the log.
//!
//! Everything runs on one thread around a single `poll`. The loop ends
//! when the shell goes away (EOF/EIO on the master side), when stdin
//! closes, or on SIGTERM or SIGHUP (the terminal window was closed).
//! Terminal attributes and the PID marker are restored by guards on every
//! exit path.

use std::ffi::CString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};

use crate::config::CaptureConfig;
use crate::files::{filename, header, PaneMetadata};
use crate::terminal::RenderPipeline;

use super::error::CaptureError;
use super::pid::PidMarker;
use super::tty::{self, RawMode, SignalPipe};

const READ_CHUNK: usize = 4096;

/// How long a hung-up shell gets to exit before it is killed.
const REAP_GRACE: Duration = Duration::from_secs(1);

/// How a capture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    pub log_path: PathBuf,
    /// Shell exit status; 128 + signal number if it was killed.
    pub exit_code: i32,
}

/// Runs one shell under a PTY and logs what it prints.
#[derive(Debug, Clone)]
pub struct PlainCapture {
    logs_dir: PathBuf,
    shell: String,
    poll_interval: Duration,
}

impl PlainCapture {
    pub fn new(logs_dir: impl Into<PathBuf>, config: &CaptureConfig) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            shell: config.resolve_shell(),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Create the log file for this capture and write its header.
    pub fn create_log(&self) -> Result<PathBuf, CaptureError> {
        fs::create_dir_all(&self.logs_dir)?;
        let path = self.logs_dir.join(filename::plain(&Local::now()));
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        PaneMetadata::new()
            .with(header::KEY_TYPE, "plain")
            .with(header::KEY_STARTED, Utc::now().to_rfc3339())
            .with(header::KEY_CWD, cwd)
            .write_to(&path)?;
        Ok(path)
    }

    /// Run the shell until it exits. Blocks the calling thread.
    pub fn run(&self) -> Result<CaptureSummary, CaptureError> {
        if !atty::is(atty::Stream::Stdin) {
            return Err(CaptureError::NotATerminal);
        }
        let argv = shell_argv(&self.shell)?;

        let log_path = self.create_log()?;
        let log = OpenOptions::new().append(true).open(&log_path)?;
        let mut log = BufWriter::new(log);
        tracing::debug!("plain capture of {} into {:?}", self.shell, log_path);

        let stdin = io::stdin().as_raw_fd();
        let original = tty::attributes(stdin).map_err(CaptureError::Terminal)?;

        // `master` is bound after `child` so it closes first on early return.
        let (mut child, master) = spawn(&argv, Some(&original), tty::window_size())?;
        let _pid_marker = PidMarker::write(&self.logs_dir, child.pid())?;
        let mut resize = SignalPipe::register(&[libc::SIGWINCH])?;
        let mut terminate = SignalPipe::register(&[libc::SIGTERM, libc::SIGHUP])?;
        let raw_mode = RawMode::enter(stdin, original).map_err(CaptureError::Terminal)?;

        let mut pipeline = RenderPipeline::new();
        let io = Pump {
            stdin,
            master: master.as_raw_fd(),
            timeout: self.poll_interval,
        };
        if let Err(e) = io.run(&mut pipeline, &mut log, &mut resize, &mut terminate) {
            tracing::debug!("capture loop ended: {}", e);
        }

        for line in pipeline.finish() {
            writeln!(log, "{}", line)?;
        }
        log.flush()?;

        // Closing the master hangs up the shell if it is still running.
        drop(master);
        let exit_code = child.wait()?;
        drop(raw_mode);

        Ok(CaptureSummary {
            log_path,
            exit_code,
        })
    }
}

/// `[shell, "-l"]` as C strings, built before fork.
fn shell_argv(shell: &str) -> Result<Vec<CString>, CaptureError> {
    let invalid = || CaptureError::InvalidShell(shell.to_string());
    if shell.is_empty() {
        return Err(invalid());
    }
    Ok(vec![
        CString::new(shell).map_err(|_| invalid())?,
        CString::new("-l").map_err(|_| invalid())?,
    ])
}

/// The forked shell. Reaped exactly once, on `wait` or on drop.
#[derive(Debug)]
struct ChildProcess {
    pid: libc::pid_t,
    reaped: bool,
}

impl ChildProcess {
    fn pid(&self) -> libc::pid_t {
        self.pid
    }

    fn wait(&mut self) -> io::Result<i32> {
        let mut status: libc::c_int = 0;
        loop {
            // SAFETY: status is a valid out-pointer for this call.
            if unsafe { libc::waitpid(self.pid, &mut status, 0) } >= 0 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                self.reaped = true;
                return Err(err);
            }
        }
        self.reaped = true;

        if libc::WIFEXITED(status) {
            Ok(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            Ok(128 + libc::WTERMSIG(status))
        } else {
            Ok(0)
        }
    }

    /// Reap without blocking; true once the child is gone.
    fn try_reap(&mut self) -> bool {
        // SAFETY: a null status pointer is allowed.
        let rc = unsafe { libc::waitpid(self.pid, std::ptr::null_mut(), libc::WNOHANG) };
        if rc == 0 || (rc < 0 && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted)
        {
            return false;
        }
        self.reaped = true;
        true
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        // SAFETY: pid is our own child, not yet reaped.
        unsafe { libc::kill(self.pid, libc::SIGHUP) };

        let deadline = Instant::now() + REAP_GRACE;
        while Instant::now() < deadline {
            if self.try_reap() {
                return;
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        tracing::warn!("shell {} ignored SIGHUP, killing it", self.pid);
        // SAFETY: as above; SIGKILL cannot be ignored, so the wait returns.
        unsafe {
            libc::kill(self.pid, libc::SIGKILL);
            libc::waitpid(self.pid, std::ptr::null_mut(), 0);
        }
    }
}

/// Fork `argv` onto a new PTY with the given terminal settings.
fn spawn(
    argv: &[CString],
    termios: Option<&libc::termios>,
    size: Option<libc::winsize>,
) -> Result<(ChildProcess, OwnedFd), CaptureError> {
    let mut ptrs: Vec<*const libc::c_char> = argv.iter().map(|a| a.as_ptr()).collect();
    ptrs.push(std::ptr::null());

    let mut termios = termios.copied();
    let termios_ptr = termios
        .as_mut()
        .map_or(std::ptr::null_mut(), |t| t as *mut libc::termios);
    let mut size = size;
    let size_ptr = size
        .as_mut()
        .map_or(std::ptr::null_mut(), |s| s as *mut libc::winsize);
    let mut master: libc::c_int = -1;

    // SAFETY: all pointers are valid for the duration of the call. The child
    // only calls async-signal-safe functions before exec or _exit.
    let pid = unsafe {
        libc::forkpty(
            &mut master,
            std::ptr::null_mut(),
            termios_ptr,
            size_ptr,
        )
    };

    if pid < 0 {
        return Err(CaptureError::Pty(io::Error::last_os_error()));
    }

    if pid == 0 {
        // SAFETY: child side of fork. Rust ignores SIGPIPE; the shell must not
        // inherit that.
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            libc::execvp(ptrs[0], ptrs.as_ptr());
            libc::_exit(127);
        }
    }

    // SAFETY: forkpty returned a fresh master descriptor that we now own.
    let master = unsafe { OwnedFd::from_raw_fd(master) };
    Ok((ChildProcess { pid, reaped: false }, master))
}

/// The poll loop shuttling bytes between the terminal and the PTY.
struct Pump {
    stdin: RawFd,
    master: RawFd,
    timeout: Duration,
}

impl Pump {
    fn run(
        &self,
        pipeline: &mut RenderPipeline,
        log: &mut impl Write,
        resize: &mut SignalPipe,
        terminate: &mut SignalPipe,
    ) -> io::Result<()> {
        const STDIN: usize = 0;
        const MASTER: usize = 1;
        const RESIZE: usize = 2;
        const TERMINATE: usize = 3;

        let mut fds = [
            pollfd(self.stdin),
            pollfd(self.master),
            pollfd(resize.fd()),
            pollfd(terminate.fd()),
        ];
        let timeout = self.timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        let mut buf = [0u8; READ_CHUNK];
        let mut stdout = io::stdout();

        tty::copy_window_size(self.master);

        loop {
            // SAFETY: fds is a valid array of pollfd for its whole length.
            let ready =
                unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if ready == 0 {
                continue;
            }

            if is_ready(&fds[TERMINATE]) {
                terminate.drain();
                tracing::debug!("termination signal received, ending capture");
                return Ok(());
            }

            if is_ready(&fds[RESIZE]) && resize.drain() {
                tty::copy_window_size(self.master);
            }

            if is_ready(&fds[MASTER]) {
                let n = match read_fd(self.master, &mut buf) {
                    Ok(0) => return Ok(()),
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    // EIO: the shell closed its side.
                    Err(e) if e.raw_os_error() == Some(libc::EIO) => return Ok(()),
                    Err(e) => return Err(e),
                };
                let data = &buf[..n];
                stdout.write_all(data)?;
                stdout.flush()?;
                for line in pipeline.feed(data) {
                    writeln!(log, "{}", line)?;
                }
                log.flush()?;
            }

            if is_ready(&fds[STDIN]) {
                let n = match read_fd(self.stdin, &mut buf) {
                    Ok(0) => return Ok(()),
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                write_all_fd(self.master, &buf[..n])?;
            }
        }
    }
}

fn pollfd(fd: RawFd) -> libc::pollfd {
    libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    }
}

fn is_ready(fd: &libc::pollfd) -> bool {
    fd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0
}

fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: buf is valid for writes of buf.len() bytes.
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(n as usize)
    }
}

fn write_all_fd(fd: RawFd, mut data: &[u8]) -> io::Result<()> {
    while !data.is_empty() {
        // SAFETY: data is valid for reads of data.len() bytes.
        let n = unsafe { libc::write(fd, data.as_ptr().cast(), data.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        data = &data[n as usize..];
    }
    Ok(())
}
