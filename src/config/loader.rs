use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::SessionConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid session config: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid session config: {message}")]
    ValidationError { message: String },
}

impl SessionConfig {
    /// `<config dir>/rote/config.toml`, or `./rote/config.toml` when the
    /// platform has no config directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rote")
            .join("config.toml")
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Parse and validate the TOML file at `path`. An absent file is not an
    /// error and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let Some(text) = read_if_present(path)? else {
            tracing::debug!(path = %path.display(), "No session config, using defaults");
            return Ok(Self::default());
        };

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let problem = if self.terminal.rows == 0 || self.terminal.cols == 0 {
            Some("terminal.rows and terminal.cols must be positive")
        } else if self.pump.iterations == 0 {
            Some("pump.iterations must be at least 1")
        } else if self.pump.chunk_size == 0 {
            Some("pump.chunk_size must be at least 1")
        } else if self.process.shell.trim().is_empty() {
            Some("process.shell must not be empty")
        } else {
            None
        };

        match problem {
            Some(message) => Err(ConfigError::ValidationError {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        }),
    }
}
