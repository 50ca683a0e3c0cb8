//! Controlling-terminal plumbing for plain captures.

use std::io::{self, Read};
use std::mem::MaybeUninit;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::SigId;

/// Current attributes of the terminal on `fd`.
pub fn attributes(fd: RawFd) -> io::Result<libc::termios> {
    let mut termios = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: tcgetattr fills the struct on success; we only read it then.
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: initialized by the successful tcgetattr above.
    Ok(unsafe { termios.assume_init() })
}

fn set_attributes(fd: RawFd, action: libc::c_int, termios: &libc::termios) -> io::Result<()> {
    // SAFETY: termios points to a valid, initialized struct.
    if unsafe { libc::tcsetattr(fd, action, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Raw mode on a terminal, undone on drop.
///
/// Restores with `TCSAFLUSH` so keystrokes typed during teardown are not
/// replayed into the user's shell.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    /// Switch `fd` to raw mode; `original` is what gets restored.
    pub fn enter(fd: RawFd, original: libc::termios) -> io::Result<Self> {
        let mut raw = original;
        // SAFETY: raw is a valid termios copy.
        unsafe { libc::cfmakeraw(&mut raw) };
        set_attributes(fd, libc::TCSANOW, &raw)?;
        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = set_attributes(self.fd, libc::TCSAFLUSH, &self.original) {
            tracing::warn!("could not restore terminal attributes: {}", e);
        }
    }
}

/// Size of the terminal on stdin, if it is one.
pub fn window_size() -> Option<libc::winsize> {
    let (terminal_size::Width(cols), terminal_size::Height(rows)) =
        terminal_size::terminal_size_of(io::stdin())?;
    Some(libc::winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    })
}

/// Set the window size of the pseudo-terminal behind `fd`.
pub fn apply_window_size(fd: RawFd, size: &libc::winsize) -> io::Result<()> {
    // SAFETY: TIOCSWINSZ reads one winsize from the pointer.
    if unsafe { libc::ioctl(fd, libc::TIOCSWINSZ, size as *const libc::winsize) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Copy the current terminal size to the pseudo-terminal, if known.
pub fn copy_window_size(master: RawFd) {
    if let Some(size) = window_size() {
        if let Err(e) = apply_window_size(master, &size) {
            tracing::debug!("could not resize pty: {}", e);
        }
    }
}

/// Signals delivered as readable bytes on a socket.
///
/// Lets `poll` wake up for a signal instead of waiting out its timeout.
/// While registered, the signals' default actions no longer apply.
pub struct SignalPipe {
    read: UnixStream,
    ids: Vec<SigId>,
}

impl SignalPipe {
    pub fn register(signals: &[libc::c_int]) -> io::Result<Self> {
        let (read, write) = UnixStream::pair()?;
        read.set_nonblocking(true)?;
        let mut pipe = Self {
            read,
            ids: Vec::with_capacity(signals.len()),
        };
        for &signal in signals {
            let id = signal_hook::low_level::pipe::register(signal, write.try_clone()?)?;
            pipe.ids.push(id);
        }
        Ok(pipe)
    }

    pub fn fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    /// Consume pending notifications; true if there were any.
    pub fn drain(&mut self) -> bool {
        let mut buf = [0u8; 64];
        let mut fired = false;
        loop {
            match self.read.read(&mut buf) {
                Ok(0) => return fired,
                Ok(_) => fired = true,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return fired,
            }
        }
    }
}

impl Drop for SignalPipe {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}
