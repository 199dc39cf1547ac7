mod plain;

pub use plain::PlainText;

use crate::grid::Grid;

/// Escape-sequence interpreter interface.
///
/// The session calls [`Interpreter::inject`] with every chunk that must be
/// applied to the screen, in the order the bytes were produced. The
/// interpreter owns all grid mutation policy (cursor motion, cell writes,
/// scrolling, dirty-row marking); the session only stores the result.
pub trait Interpreter: Send {
    fn inject(&mut self, grid: &mut Grid, bytes: &[u8]);
}

impl<F> Interpreter for F
where
    F: FnMut(&mut Grid, &[u8]) + Send,
{
    fn inject(&mut self, grid: &mut Grid, bytes: &[u8]) {
        self(grid, bytes)
    }
}
