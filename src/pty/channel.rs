use std::io;
use std::os::unix::io::RawFd;

use super::ChildExit;

/// The master side of a pseudo-terminal, as seen by a session.
///
/// [`super::PortablePty`] is the real implementation. Embedders can attach
/// anything else that behaves like a descriptor (a socket pair, a recorded
/// stream, a test double).
pub trait PtyChannel: Send {
    /// Raw descriptor for callers that multiplex it in their own event loop.
    fn raw_fd(&self) -> Option<RawFd>;

    /// Zero-timeout readiness check. Must never block.
    fn poll_readable(&mut self) -> io::Result<bool>;

    /// Read at most `buf.len()` bytes. Only called after `poll_readable`
    /// returned `true`. `Ok(0)` means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write some prefix of `buf` and return its length. May be partial.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Process id of the attached child, if this channel spawned one.
    fn child_id(&self) -> Option<u32> {
        None
    }

    /// Non-blocking check for child exit. Never reaps unless asked.
    fn try_wait(&mut self) -> io::Result<Option<ChildExit>> {
        Ok(None)
    }
}

/// `poll()` on a single descriptor with a zero timeout.
///
/// Hangup and error conditions count as readable so the following read can
/// observe end of stream. Unlike `select()` there is no `FD_SETSIZE` ceiling.
pub fn poll_readable(fd: RawFd) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        let ret = unsafe { libc::poll(&mut pfd, 1, 0) };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if ret == 0 {
            return Ok(false);
        }
        if pfd.revents & libc::POLLNVAL != 0 {
            return Err(io::Error::from_raw_os_error(libc::EBADF));
        }
        return Ok(pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0);
    }
}
