use std::io;
use std::os::unix::io::RawFd;

use crate::config::{PumpConfig, SessionConfig};
use crate::error::SessionError;
use crate::grid::Grid;
use crate::interpreter::Interpreter;
use crate::pty::{ChildExit, PortablePty, ProcessHandle, PtyChannel, SpawnConfig};

/// Why a [`Session::pump`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStop {
    /// No process attached; nothing was polled.
    Detached,
    /// The descriptor had nothing to read.
    Idle,
    /// The child closed its side of the pty.
    EndOfStream,
    /// Readiness check or read failed.
    ReadError,
    /// The per-call read limit was reached with data possibly still pending.
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpReport {
    pub reads: usize,
    pub bytes: usize,
    pub stop: PumpStop,
}

impl PumpReport {
    fn stopped(self, stop: PumpStop) -> Self {
        Self { stop, ..self }
    }
}

/// A terminal screen plus the child process feeding it.
///
/// The session owns its grid, its pty channel and its interpreter. It runs
/// no threads and takes no locks; callers that share it across threads must
/// serialize access themselves.
pub struct Session {
    grid: Grid,
    process: ProcessHandle,
    handler: Option<Box<dyn Interpreter>>,
    spawn: SpawnConfig,
    pump: PumpConfig,
    error_notice: Vec<u8>,
    read_buf: Vec<u8>,
}

impl Session {
    /// A detached session with a blank `rows x cols` grid and default settings.
    pub fn new(rows: u16, cols: u16) -> Result<Self, SessionError> {
        let mut config = SessionConfig::default();
        config.terminal.rows = rows;
        config.terminal.cols = cols;
        Self::with_config(&config)
    }

    pub fn with_config(config: &SessionConfig) -> Result<Self, SessionError> {
        let grid = Grid::new(config.terminal.rows, config.terminal.cols)?;
        tracing::debug!(
            rows = config.terminal.rows,
            cols = config.terminal.cols,
            "Created session"
        );

        let pump = PumpConfig {
            iterations: config.pump.iterations.max(1),
            chunk_size: config.pump.chunk_size.max(1),
        };
        Ok(Self {
            grid,
            process: ProcessHandle::new(),
            handler: None,
            spawn: config.process.spawn_config(),
            read_buf: vec![0u8; pump.chunk_size],
            pump,
            error_notice: config.write.error_notice.clone().into_bytes(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rows changed since the last call, for a redraw consumer.
    pub fn take_dirty_rows(&mut self) -> Vec<u16> {
        self.grid.take_dirty_rows()
    }

    pub fn clear_dirty(&mut self, row: u16) {
        self.grid.clear_dirty(row);
    }

    pub fn spawn_config_mut(&mut self) -> &mut SpawnConfig {
        &mut self.spawn
    }

    pub fn pump_config(&self) -> &PumpConfig {
        &self.pump
    }

    /// Change the per-call pump bounds. Zero values are raised to one.
    pub fn set_pump_config(&mut self, pump: PumpConfig) {
        self.pump = PumpConfig {
            iterations: pump.iterations.max(1),
            chunk_size: pump.chunk_size.max(1),
        };
        self.read_buf.resize(self.pump.chunk_size, 0);
    }

    /// Install the interpreter that applies bytes to the grid. Until one is
    /// installed, injected bytes are discarded.
    pub fn install_handler(&mut self, handler: impl Interpreter + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn take_handler(&mut self) -> Option<Box<dyn Interpreter>> {
        self.handler.take()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Apply `bytes` to the grid through the installed interpreter.
    pub fn inject(&mut self, bytes: &[u8]) {
        dispatch(&mut self.handler, &mut self.grid, bytes);
    }

    /// Run `<shell> -c <command>` on a new pty sized to the grid.
    ///
    /// Returns the child's process id. Any previously attached child is
    /// detached first. On failure the session stays detached and `attach`
    /// may be retried.
    pub fn attach(&mut self, command: &str) -> Result<u32, SessionError> {
        if self.process.is_attached() {
            tracing::warn!("Attach while a child is attached; detaching the previous one");
            self.detach();
        }

        let pty = PortablePty::spawn(self.grid.rows(), self.grid.cols(), &self.spawn, command)
            .inspect_err(|e| tracing::warn!("{}", e))?;
        self.adopt_child(Box::new(pty), command)
    }

    /// Install a freshly spawned channel. A channel without a positive child
    /// id is dropped and reported as a spawn failure; 0 means "no process".
    fn adopt_child(
        &mut self,
        channel: Box<dyn PtyChannel>,
        command: &str,
    ) -> Result<u32, SessionError> {
        let pid = match channel.child_id() {
            Some(pid) if pid > 0 => pid,
            _ => {
                let err = SessionError::SpawnFailed {
                    command: command.to_string(),
                    error: "child has no process id".to_string(),
                };
                tracing::warn!("{}", err);
                return Err(err);
            }
        };
        tracing::info!(pid, fd = ?channel.raw_fd(), command, "Attached child");

        self.process.attach(channel);
        Ok(pid)
    }

    /// Attach an already-open channel instead of spawning a child.
    pub fn attach_channel(&mut self, channel: Box<dyn PtyChannel>) {
        if self.process.attach(channel).is_some() {
            tracing::debug!("Replaced attached channel");
        }
    }

    /// Close the descriptor and forget the child. Safe to call repeatedly.
    ///
    /// The child is not signalled or reaped; that policy belongs to the
    /// caller (see [`Session::try_wait`] and [`Session::child_id`]).
    pub fn detach(&mut self) {
        let pid = self.process.child_id();
        if self.process.detach() {
            tracing::debug!(pid = ?pid, "Detached child");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.process.is_attached()
    }

    /// The pty master descriptor, for callers that wait on it in their own
    /// event loop before calling [`Session::pump`].
    pub fn raw_fd(&self) -> Option<RawFd> {
        self.process.raw_fd()
    }

    pub fn child_id(&self) -> Option<u32> {
        self.process.child_id()
    }

    /// Non-blocking exit check for the attached child.
    pub fn try_wait(&mut self) -> Result<Option<ChildExit>, SessionError> {
        self.process
            .try_wait()
            .map_err(|e| SessionError::descriptor("wait", e))
    }

    /// Drain pending child output into the interpreter.
    ///
    /// Performs at most `pump.iterations` reads of at most `pump.chunk_size`
    /// bytes each and never blocks. The bound keeps a child that floods
    /// output from monopolizing the caller, which in turn must call `pump`
    /// frequently (or whenever [`Session::raw_fd`] becomes readable) to keep
    /// up. Read failures end the call and are reported, not returned.
    pub fn pump(&mut self) -> PumpReport {
        let report = PumpReport {
            reads: 0,
            bytes: 0,
            stop: PumpStop::Detached,
        };
        let Some(channel) = self.process.channel_mut() else {
            return report;
        };

        let mut report = report;
        for _ in 0..self.pump.iterations {
            match channel.poll_readable() {
                Ok(true) => {}
                Ok(false) => return report.stopped(PumpStop::Idle),
                Err(err) => {
                    tracing::debug!("PTY readiness check failed: {}", err);
                    return report.stopped(PumpStop::ReadError);
                }
            }

            let count = match channel.read(&mut self.read_buf) {
                Ok(0) => return report.stopped(PumpStop::EndOfStream),
                Ok(count) => count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    return report.stopped(PumpStop::Idle);
                }
                // Linux reports a hung-up pty master as EIO rather than EOF.
                Err(err) if err.raw_os_error() == Some(libc::EIO) => {
                    return report.stopped(PumpStop::EndOfStream);
                }
                Err(err) => {
                    tracing::debug!("PTY read failed: {}", err);
                    return report.stopped(PumpStop::ReadError);
                }
            };

            report.reads += 1;
            report.bytes += count;
            tracing::trace!(count, "PTY output");
            dispatch(&mut self.handler, &mut self.grid, &self.read_buf[..count]);
        }

        report.stopped(PumpStop::BudgetExhausted)
    }

    /// Send input to the child, or inject it straight into the grid when no
    /// child is attached (local echo).
    ///
    /// Partial writes are resumed until every byte is written. May block
    /// while the kernel pty buffer is full.
    pub fn write(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let channel = match self.process.channel_mut() {
            Some(channel) => channel,
            None => {
                self.inject(data);
                return Ok(());
            }
        };

        let mut remaining = data;
        while !remaining.is_empty() {
            match channel.write(remaining) {
                Ok(0) => {
                    return Err(SessionError::descriptor(
                        "write",
                        io::Error::from(io::ErrorKind::WriteZero),
                    ));
                }
                Ok(written) => remaining = &remaining[written..],
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(SessionError::descriptor("write", err)),
            }
        }
        Ok(())
    }

    /// [`Session::write`], but a failure is rendered into the grid as the
    /// configured notice instead of being returned.
    pub fn write_or_report(&mut self, data: &[u8]) {
        if let Err(err) = self.write(data) {
            tracing::warn!(disconnect = err.is_disconnect(), "{}", err);
            dispatch(&mut self.handler, &mut self.grid, &self.error_notice);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Descriptor goes before the grid memory.
        self.detach();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("process", &self.process)
            .field("has_handler", &self.handler.is_some())
            .field("pump", &self.pump)
            .finish()
    }
}

fn dispatch(handler: &mut Option<Box<dyn Interpreter>>, grid: &mut Grid, bytes: &[u8]) {
    if let Some(handler) = handler.as_mut() {
        handler.inject(grid, bytes);
    }
}
