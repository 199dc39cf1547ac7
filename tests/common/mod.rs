//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_channel;

use rote::{Grid, Session, SessionConfig};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub use mock_channel::{ChannelState, MockChannel, ReadFailure};

/// Every chunk an interpreter was handed, in order.
pub type SpyBuffer = Arc<Mutex<Vec<Vec<u8>>>>;

/// Install a handler on `session` that records injected chunks.
pub fn install_spy(session: &mut Session) -> SpyBuffer {
    let spy: SpyBuffer = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&spy);
    session.install_handler(move |_: &mut Grid, bytes: &[u8]| {
        sink.lock().unwrap().push(bytes.to_vec());
    });
    spy
}

/// All recorded chunks concatenated.
pub fn spy_bytes(spy: &SpyBuffer) -> Vec<u8> {
    spy.lock().unwrap().concat()
}

pub fn session_with_pump(iterations: usize, chunk_size: usize) -> Session {
    let mut config = SessionConfig::default();
    config.terminal.rows = 5;
    config.terminal.cols = 40;
    config.pump.iterations = iterations;
    config.pump.chunk_size = chunk_size;
    Session::with_config(&config).expect("valid config")
}

/// Write `content` to a config.toml inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
