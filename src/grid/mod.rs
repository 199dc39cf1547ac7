mod attr;

pub use attr::Attr;

use serde::Serialize;

use crate::error::SessionError;

/// A single screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        attr: Attr::DEFAULT,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
}

/// Inclusive row range that line scrolling applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRegion {
    pub top: u16,
    pub bottom: u16,
}

/// Fixed-size character grid.
///
/// Dimensions never change after construction; a different size means a new
/// grid. Cells are stored row-major, so every row is exactly `cols` wide.
/// The grid only stores state: deciding what to write where is the job of the
/// installed [`crate::Interpreter`].
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
    cursor: Cursor,
    attr: Attr,
    scroll: ScrollRegion,
    dirty: Vec<bool>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Result<Self, SessionError> {
        if rows == 0 || cols == 0 {
            return Err(SessionError::InvalidDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::BLANK; usize::from(rows) * usize::from(cols)],
            cursor: Cursor::default(),
            attr: Attr::DEFAULT,
            scroll: ScrollRegion {
                top: 0,
                bottom: rows - 1,
            },
            dirty: vec![false; usize::from(rows)],
        })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, row: u16, col: u16) -> Option<&mut Cell> {
        self.index(row, col).map(move |i| &mut self.cells[i])
    }

    pub fn row(&self, row: u16) -> Option<&[Cell]> {
        let start = self.index(row, 0)?;
        Some(&self.cells[start..start + usize::from(self.cols)])
    }

    pub fn row_mut(&mut self, row: u16) -> Option<&mut [Cell]> {
        let start = self.index(row, 0)?;
        let end = start + usize::from(self.cols);
        Some(&mut self.cells[start..end])
    }

    /// Characters of a row with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> Option<String> {
        let cells = self.row(row)?;
        let text: String = cells.iter().map(|c| c.ch).collect();
        Some(text.trim_end_matches(' ').to_string())
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor, clamping to the grid bounds.
    pub fn set_cursor(&mut self, row: u16, col: u16) {
        self.cursor = Cursor {
            row: row.min(self.rows - 1),
            col: col.min(self.cols - 1),
        };
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }

    pub fn set_attr(&mut self, attr: Attr) {
        self.attr = attr;
    }

    pub fn scroll_region(&self) -> ScrollRegion {
        self.scroll
    }

    /// Narrow or widen the scroll region.
    ///
    /// Returns `false` and keeps the current region if the bounds are not
    /// `top <= bottom < rows`.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) -> bool {
        if top > bottom || bottom >= self.rows {
            return false;
        }
        self.scroll = ScrollRegion { top, bottom };
        true
    }

    pub fn is_dirty(&self, row: u16) -> bool {
        self.dirty.get(usize::from(row)).copied().unwrap_or(false)
    }

    pub fn mark_dirty(&mut self, row: u16) {
        if let Some(flag) = self.dirty.get_mut(usize::from(row)) {
            *flag = true;
        }
    }

    pub fn clear_dirty(&mut self, row: u16) {
        if let Some(flag) = self.dirty.get_mut(usize::from(row)) {
            *flag = false;
        }
    }

    pub fn dirty_rows(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.rows).filter(move |&row| self.dirty[usize::from(row)])
    }

    /// Rows flagged dirty, in order. Clears every flag it returns.
    pub fn take_dirty_rows(&mut self) -> Vec<u16> {
        let rows: Vec<u16> = self.dirty_rows().collect();
        for &row in &rows {
            self.clear_dirty(row);
        }
        rows
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cursor: self.cursor,
            scroll_region: self.scroll,
            lines: (0..self.rows)
                .map(|row| self.row_text(row).unwrap_or_default())
                .collect(),
            dirty_rows: self.dirty_rows().collect(),
        }
    }
}

/// Serializable view of the screen text, for tooling and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub rows: u16,
    pub cols: u16,
    pub cursor: Cursor,
    pub scroll_region: ScrollRegion,
    pub lines: Vec<String>,
    pub dirty_rows: Vec<u16>,
}

impl GridSnapshot {
    /// Screen text with trailing empty lines dropped.
    pub fn text(&self) -> String {
        let last = self
            .lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |i| i + 1);
        self.lines[..last].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_blank() {
        let grid = Grid::new(3, 4).unwrap();
        for row in 0..3 {
            let cells = grid.row(row).unwrap();
            assert_eq!(cells.len(), 4);
            assert!(cells.iter().all(|c| *c == Cell::BLANK));
            assert!(!grid.is_dirty(row));
        }
        assert_eq!(grid.cursor(), Cursor { row: 0, col: 0 });
        assert_eq!(grid.attr(), Attr::DEFAULT);
        assert_eq!(grid.scroll_region(), ScrollRegion { top: 0, bottom: 2 });
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(SessionError::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            Grid::new(5, 0),
            Err(SessionError::InvalidDimensions { rows: 5, cols: 0 })
        ));
    }

    #[test]
    fn out_of_bounds_access_is_none() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.cell(2, 0).is_none());
        assert!(grid.cell(0, 2).is_none());
        assert!(grid.cell_mut(5, 5).is_none());
        assert!(grid.row(2).is_none());
        assert!(grid.row_text(9).is_none());
        assert!(!grid.is_dirty(9));
        grid.mark_dirty(9);
        assert_eq!(grid.dirty_rows().count(), 0);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut grid = Grid::new(5, 10).unwrap();
        grid.set_cursor(9, 99);
        assert_eq!(grid.cursor(), Cursor { row: 4, col: 9 });
    }

    #[test]
    fn scroll_region_rejects_bad_bounds() {
        let mut grid = Grid::new(10, 10).unwrap();
        assert!(grid.set_scroll_region(2, 7));
        assert!(!grid.set_scroll_region(8, 3));
        assert!(!grid.set_scroll_region(0, 10));
        assert_eq!(grid.scroll_region(), ScrollRegion { top: 2, bottom: 7 });
        assert!(grid.set_scroll_region(4, 4));
    }

    #[test]
    fn take_dirty_rows_clears_flags() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.mark_dirty(3);
        grid.mark_dirty(1);
        assert_eq!(grid.take_dirty_rows(), vec![1, 3]);
        assert_eq!(grid.dirty_rows().count(), 0);
    }

    #[test]
    fn row_text_trims_trailing_blanks() {
        let mut grid = Grid::new(2, 6).unwrap();
        grid.cell_mut(0, 1).unwrap().ch = 'h';
        grid.cell_mut(0, 2).unwrap().ch = 'i';
        assert_eq!(grid.row_text(0).as_deref(), Some(" hi"));
        assert_eq!(grid.row_text(1).as_deref(), Some(""));
    }

    #[test]
    fn snapshot_text_drops_trailing_empty_lines() {
        let mut grid = Grid::new(4, 3).unwrap();
        grid.row_mut(1).unwrap()[0].ch = 'x';
        let snapshot = grid.snapshot();
        assert_eq!(snapshot.lines.len(), 4);
        assert_eq!(snapshot.text(), "\nx");
    }
}
