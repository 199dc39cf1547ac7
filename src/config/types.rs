use serde::{Deserialize, Serialize};

use crate::pty::{SpawnConfig, DEFAULT_SHELL, DEFAULT_TERM};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub pump: PumpConfig,
    #[serde(default)]
    pub write: WriteConfig,
}

/// Grid dimensions for new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default = "default_rows")]
    pub rows: u16,
    #[serde(default = "default_cols")]
    pub cols: u16,
}

/// How attached commands are launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Interpreter invoked as `<shell> -c <command>` (default: /bin/sh).
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Value forced into the child's TERM (default: linux).
    #[serde(default = "default_term")]
    pub term: String,
}

/// Fairness bounds for a single `Session::pump` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpConfig {
    /// Maximum reads per call (default: 5).
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Bytes requested per read (default: 512).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Text injected by `Session::write_or_report` when a pty write fails.
    #[serde(default = "default_error_notice")]
    pub error_notice: String,
}

fn default_rows() -> u16 {
    24
}

fn default_cols() -> u16 {
    80
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

fn default_term() -> String {
    DEFAULT_TERM.to_string()
}

fn default_iterations() -> usize {
    5
}

fn default_chunk_size() -> usize {
    512
}

fn default_error_notice() -> String {
    "\n(pty write error)\n".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            term: default_term(),
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            error_notice: default_error_notice(),
        }
    }
}

impl ProcessConfig {
    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            shell: self.shell.clone(),
            term: self.term.clone(),
            cwd: None,
        }
    }
}
