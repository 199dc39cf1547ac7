//! Scriptable in-memory pty channel.

#![allow(dead_code)]

use rote::{ChildExit, PtyChannel};
use std::collections::VecDeque;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::{Arc, Mutex};

/// State shared between a test and the channel it handed to a session.
#[derive(Debug, Default)]
pub struct ChannelState {
    /// Output the "child" has produced and not yet been read.
    pub pending: VecDeque<u8>,
    /// Child closed its side once `pending` is drained.
    pub eof: bool,
    /// Every readiness check reports data and every read fills the buffer.
    pub flood: bool,
    pub reads: usize,
    pub polls: usize,
    /// Fail every readiness check with this error kind.
    pub poll_error: Option<io::ErrorKind>,
    /// Fail reads with this error once `reads_before_error` reads succeeded.
    pub read_error: Option<ReadFailure>,
    pub reads_before_error: usize,
    /// Input received from the session.
    pub written: Vec<u8>,
    pub write_calls: usize,
    /// Accept at most this many bytes per write call.
    pub max_write: Option<usize>,
    /// Fail every write with this error kind.
    pub write_error: Option<io::ErrorKind>,
    /// Fail the next N writes with `Interrupted` before accepting data.
    pub interrupts: usize,
    pub exit: Option<ChildExit>,
    pub dropped: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ReadFailure {
    Kind(io::ErrorKind),
    Errno(i32),
}

impl ReadFailure {
    fn to_error(self) -> io::Error {
        match self {
            ReadFailure::Kind(kind) => io::Error::from(kind),
            ReadFailure::Errno(errno) => io::Error::from_raw_os_error(errno),
        }
    }
}

pub struct MockChannel {
    state: Arc<Mutex<ChannelState>>,
    fd: RawFd,
    pid: Option<u32>,
}

impl MockChannel {
    pub fn new() -> (Self, Arc<Mutex<ChannelState>>) {
        let state = Arc::new(Mutex::new(ChannelState::default()));
        let channel = Self {
            state: Arc::clone(&state),
            fd: 42,
            pid: Some(4242),
        };
        (channel, state)
    }

    pub fn with_output(bytes: &[u8]) -> (Self, Arc<Mutex<ChannelState>>) {
        let (channel, state) = Self::new();
        state.lock().unwrap().pending.extend(bytes.iter().copied());
        (channel, state)
    }
}

impl PtyChannel for MockChannel {
    fn raw_fd(&self) -> Option<RawFd> {
        Some(self.fd)
    }

    fn poll_readable(&mut self) -> io::Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if let Some(kind) = state.poll_error {
            return Err(io::Error::from(kind));
        }
        Ok(state.flood || !state.pending.is_empty() || state.eof)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if let Some(failure) = state.read_error {
            if state.reads > state.reads_before_error {
                return Err(failure.to_error());
            }
        }
        if state.flood {
            buf.fill(b'y');
            return Ok(buf.len());
        }
        let count = buf.len().min(state.pending.len());
        for (slot, byte) in buf.iter_mut().zip(state.pending.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.write_calls += 1;
        if state.interrupts > 0 {
            state.interrupts -= 1;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        if let Some(kind) = state.write_error {
            return Err(io::Error::from(kind));
        }
        let count = state.max_write.map_or(buf.len(), |max| max.min(buf.len()));
        state.written.extend_from_slice(&buf[..count]);
        Ok(count)
    }

    fn child_id(&self) -> Option<u32> {
        self.pid
    }

    fn try_wait(&mut self) -> io::Result<Option<ChildExit>> {
        Ok(self.state.lock().unwrap().exit)
    }
}

impl Drop for MockChannel {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.dropped = true;
        }
    }
}
