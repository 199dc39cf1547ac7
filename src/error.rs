use std::io;
use thiserror::Error;

/// Errors surfaced by a [`crate::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimensions { rows: u16, cols: u16 },

    /// Pty allocation or process spawn failed. The session stays detached.
    #[error("Failed to spawn '{command}': {error}")]
    SpawnFailed { command: String, error: String },

    #[error("PTY {operation} failed: {source}")]
    DescriptorError {
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    pub(crate) fn descriptor(operation: &'static str, source: io::Error) -> Self {
        SessionError::DescriptorError { operation, source }
    }

    /// True when the error means the child side of the pty is gone
    /// (broken pipe, or `EIO` once the slave has been closed).
    pub fn is_disconnect(&self) -> bool {
        match self {
            SessionError::DescriptorError { source, .. } => {
                source.kind() == io::ErrorKind::BrokenPipe
                    || source.raw_os_error() == Some(libc::EIO)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_is_disconnect() {
        let err = SessionError::descriptor("write", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(err.is_disconnect());
    }

    #[test]
    fn eio_is_disconnect() {
        let err = SessionError::descriptor("write", io::Error::from_raw_os_error(libc::EIO));
        assert!(err.is_disconnect());
    }

    #[test]
    fn other_errors_are_not_disconnect() {
        let err = SessionError::descriptor("write", io::Error::from(io::ErrorKind::Other));
        assert!(!err.is_disconnect());

        let err = SessionError::InvalidDimensions { rows: 0, cols: 5 };
        assert!(!err.is_disconnect());
        assert_eq!(
            err.to_string(),
            "Invalid grid dimensions 0x5: both must be positive"
        );
    }
}
