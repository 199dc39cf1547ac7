mod channel;
mod handle;
mod spawn_config;
mod system;

pub use channel::{poll_readable, PtyChannel};
pub use handle::ProcessHandle;
pub use spawn_config::{SpawnConfig, DEFAULT_SHELL, DEFAULT_TERM};
pub use system::PortablePty;

/// Exit status reserved for "the program could not be executed".
///
/// `/bin/sh -c` exits with it when the command cannot be found,
/// so a supervisor can tell that apart from a command that ran and failed.
pub const EXEC_FAILED_STATUS: u32 = 127;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    Exited(u32),
    ExecFailed,
}

impl ChildExit {
    pub fn from_code(code: u32) -> Self {
        if code == EXEC_FAILED_STATUS {
            ChildExit::ExecFailed
        } else {
            ChildExit::Exited(code)
        }
    }

    pub fn success(self) -> bool {
        self == ChildExit::Exited(0)
    }
}
