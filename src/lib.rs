//! Session layer of an embeddable terminal emulator.
//!
//! ```text
//! Session
//! ├── Grid (cells, cursor, attribute, scroll region, dirty rows)
//! ├── ProcessHandle (pty descriptor + child identity)
//! └── Interpreter (installed by the embedder, applies bytes to the Grid)
//! ```
//!
//! The core never spawns threads. Callers drive it by calling
//! [`Session::pump`] from their own loop and [`Session::write`] with input.

pub mod config;
pub mod error;
pub mod grid;
pub mod interpreter;
pub mod logging;
pub mod pty;
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use grid::{Attr, Cell, Cursor, Grid, GridSnapshot, ScrollRegion};
pub use interpreter::{Interpreter, PlainText};
pub use pty::{ChildExit, PtyChannel};
pub use session::{PumpReport, PumpStop, Session};
