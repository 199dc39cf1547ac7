use std::io;
use std::os::unix::io::RawFd;

use super::channel::PtyChannel;
use super::ChildExit;

/// Owns the pty channel of a session, if any.
///
/// Detached is the initial state and the state after [`ProcessHandle::detach`].
/// The channel (and with it the descriptor) is released by `Drop` on every
/// path, so callers never close descriptors by hand.
#[derive(Default)]
pub struct ProcessHandle {
    channel: Option<Box<dyn PtyChannel>>,
}

impl ProcessHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }

    /// Install a channel, returning the one it replaces.
    pub fn attach(&mut self, channel: Box<dyn PtyChannel>) -> Option<Box<dyn PtyChannel>> {
        self.channel.replace(channel)
    }

    /// Release the channel. Idempotent.
    pub fn detach(&mut self) -> bool {
        self.channel.take().is_some()
    }

    pub fn channel_mut(&mut self) -> Option<&mut (dyn PtyChannel + 'static)> {
        self.channel.as_deref_mut()
    }

    pub fn raw_fd(&self) -> Option<RawFd> {
        self.channel.as_ref().and_then(|c| c.raw_fd())
    }

    pub fn child_id(&self) -> Option<u32> {
        self.channel.as_ref().and_then(|c| c.child_id())
    }

    pub fn try_wait(&mut self) -> io::Result<Option<ChildExit>> {
        match self.channel.as_mut() {
            Some(channel) => channel.try_wait(),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("fd", &self.raw_fd())
            .field("child_id", &self.child_id())
            .finish()
    }
}
