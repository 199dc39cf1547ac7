use portable_pty::CommandBuilder;
use std::path::PathBuf;

/// Platform-standard command interpreter used to run attached commands.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Terminal type advertised to children. Programs then emit the
/// linux-console escape sequences the interpreter is expected to handle.
pub const DEFAULT_TERM: &str = "linux";

/// How attached commands are launched.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    pub shell: String,
    pub term: String,
    /// Working directory for the child. `None` inherits ours.
    pub cwd: Option<PathBuf>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            term: DEFAULT_TERM.to_string(),
            cwd: None,
        }
    }
}

impl SpawnConfig {
    /// `<shell> -c <command>` with `TERM` forced. `command` is passed verbatim;
    /// quoting is the caller's business.
    pub fn build(&self, command: &str) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(&self.shell);
        cmd.arg("-c");
        cmd.arg(command);
        cmd.env("TERM", &self.term);

        let cwd = self.cwd.clone().or_else(|| std::env::current_dir().ok());
        if let Some(cwd) = cwd {
            cmd.cwd(cwd);
        }
        cmd
    }
}
