use super::Interpreter;
use crate::grid::{Cell, Grid};

const TAB_WIDTH: u16 = 8;

/// Minimal interpreter that understands no escape sequences.
///
/// Printable bytes are drawn as Latin-1 characters with the grid's current
/// attribute. `\r`, `\n`, backspace and tab move the cursor; any other control
/// byte is drawn as a space. Useful for local echo, logs and tests.
#[derive(Debug, Default)]
pub struct PlainText {
    // Cursor sits past the right margin; the next printable wraps first.
    wrap_pending: bool,
}

impl PlainText {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, grid: &mut Grid, ch: char) {
        if self.wrap_pending {
            self.wrap_pending = false;
            let cursor = grid.cursor();
            grid.set_cursor(cursor.row, 0);
            line_feed(grid);
        }

        let cursor = grid.cursor();
        let attr = grid.attr();
        if let Some(cell) = grid.cell_mut(cursor.row, cursor.col) {
            *cell = Cell { ch, attr };
        }
        grid.mark_dirty(cursor.row);

        if cursor.col + 1 >= grid.cols() {
            self.wrap_pending = true;
        } else {
            grid.set_cursor(cursor.row, cursor.col + 1);
        }
    }
}

impl Interpreter for PlainText {
    fn inject(&mut self, grid: &mut Grid, bytes: &[u8]) {
        for &byte in bytes {
            match byte {
                b'\r' => {
                    self.wrap_pending = false;
                    let cursor = grid.cursor();
                    grid.set_cursor(cursor.row, 0);
                }
                b'\n' => {
                    self.wrap_pending = false;
                    line_feed(grid);
                }
                0x08 => {
                    self.wrap_pending = false;
                    let cursor = grid.cursor();
                    grid.set_cursor(cursor.row, cursor.col.saturating_sub(1));
                }
                b'\t' => {
                    self.wrap_pending = false;
                    let cursor = grid.cursor();
                    let next = (cursor.col / TAB_WIDTH + 1).saturating_mul(TAB_WIDTH);
                    grid.set_cursor(cursor.row, next);
                }
                _ => self.put(grid, char::from(printable(byte))),
            }
        }
    }
}

fn printable(byte: u8) -> u8 {
    if byte < 0x20 || byte == 0x7f {
        b' '
    } else {
        byte
    }
}

/// Move down one row, scrolling the scroll region when the cursor sits on
/// its bottom line. Outside the region the cursor stops at the last row.
fn line_feed(grid: &mut Grid) {
    let cursor = grid.cursor();
    let region = grid.scroll_region();

    if cursor.row == region.bottom {
        scroll_up(grid, region.top, region.bottom);
    } else if cursor.row + 1 < grid.rows() {
        grid.set_cursor(cursor.row + 1, cursor.col);
    }
}

fn scroll_up(grid: &mut Grid, top: u16, bottom: u16) {
    for row in top..bottom {
        let below: Vec<Cell> = match grid.row(row + 1) {
            Some(cells) => cells.to_vec(),
            None => return,
        };
        if let Some(cells) = grid.row_mut(row) {
            cells.copy_from_slice(&below);
        }
        grid.mark_dirty(row);
    }

    let blank = Cell {
        ch: ' ',
        attr: grid.attr(),
    };
    if let Some(cells) = grid.row_mut(bottom) {
        cells.fill(blank);
    }
    grid.mark_dirty(bottom);
}
