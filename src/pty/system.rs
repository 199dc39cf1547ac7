use portable_pty::{native_pty_system, Child, MasterPty, PtySize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::{FromRawFd, RawFd};

use super::channel::{poll_readable, PtyChannel};
use super::spawn_config::SpawnConfig;
use super::ChildExit;
use crate::error::SessionError;

/// A child process running on the slave side of a native pty.
///
/// Dropping it closes the master descriptor. The child is neither signalled
/// nor waited for, and nothing is written to it; it sees a hangup once the
/// master is gone.
pub struct PortablePty {
    fd: RawFd,
    reader: Box<dyn Read + Send>,
    // Not `take_writer()`: that writer types "\n" + VEOF into the child on drop.
    writer: File,
    child: Box<dyn Child + Send + Sync>,
    _master: Box<dyn MasterPty + Send>,
}

impl PortablePty {
    pub fn spawn(
        rows: u16,
        cols: u16,
        config: &SpawnConfig,
        command: &str,
    ) -> Result<Self, SessionError> {
        let spawn_failed = |error: String| SessionError::SpawnFailed {
            command: command.to_string(),
            error,
        };

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| spawn_failed(e.to_string()))?;

        let child = pair
            .slave
            .spawn_command(config.build(command))
            .map_err(|e| spawn_failed(e.to_string()))?;
        drop(pair.slave);

        let master = pair.master;
        let fd = master
            .as_raw_fd()
            .ok_or_else(|| spawn_failed("pty master has no descriptor".to_string()))?;
        let reader = master
            .try_clone_reader()
            .map_err(|e| spawn_failed(e.to_string()))?;
        let writer = dup_cloexec(fd).map_err(|e| spawn_failed(e.to_string()))?;

        Ok(Self {
            fd,
            reader,
            writer,
            child,
            _master: master,
        })
    }
}

/// Duplicate `fd` with close-on-exec set so later children don't inherit it.
fn dup_cloexec(fd: RawFd) -> io::Result<File> {
    let dup = unsafe { libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, 0) };
    if dup < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { File::from_raw_fd(dup) })
}

impl PtyChannel for PortablePty {
    fn raw_fd(&self) -> Option<RawFd> {
        Some(self.fd)
    }

    fn poll_readable(&mut self) -> io::Result<bool> {
        poll_readable(self.fd)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn child_id(&self) -> Option<u32> {
        self.child.process_id()
    }

    fn try_wait(&mut self) -> io::Result<Option<ChildExit>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| ChildExit::from_code(status.exit_code())))
    }
}
