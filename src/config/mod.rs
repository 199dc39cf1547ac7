mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ProcessConfig, PumpConfig, SessionConfig, TerminalConfig, WriteConfig};
