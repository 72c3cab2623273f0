// src/frame/grid.rs
//
// Plain-data pixel grid owned by the editor. The encoder only ever borrows it.

use std::fmt;
use std::str::FromStr;

use crate::error::P10Error;

/// Panel height in pixels
pub const ROWS: usize = 16;
/// Panel width in pixels
pub const COLS: usize = 32;

/// 16x32 monochrome pixel pattern. Row 0 is the top row, column 0 the leftmost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelGrid {
    cells: [[bool; COLS]; ROWS],
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// All pixels off
    pub fn new() -> Self {
        Self {
            cells: [[false; COLS]; ROWS],
        }
    }

    /// All pixels on
    pub fn filled() -> Self {
        Self {
            cells: [[true; COLS]; ROWS],
        }
    }

    /// Build a grid from dynamically sized rows.
    ///
    /// Any shape other than exactly 16x32 (including ragged rows) is rejected
    /// with `ShapeMismatch`. Nothing is truncated or padded.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, P10Error> {
        check_shape(rows, "grid")?;

        let mut grid = Self::new();
        for (dst, src) in grid.cells.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(grid)
    }

    /// Pixel state, or `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set a pixel. Out-of-bounds coordinates are ignored and return false.
    pub fn set(&mut self, row: usize, col: usize, on: bool) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = on;
                true
            }
            None => false,
        }
    }

    /// Flip a pixel and return its new state
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<bool> {
        let cell = self.cells.get_mut(row).and_then(|r| r.get_mut(col))?;
        *cell = !*cell;
        Some(*cell)
    }

    pub fn clear(&mut self) {
        self.cells = [[false; COLS]; ROWS];
    }

    pub fn fill(&mut self) {
        self.cells = [[true; COLS]; ROWS];
    }

    /// Number of lit pixels
    pub fn count_on(&self) -> usize {
        self.cells
            .iter()
            .map(|r| r.iter().filter(|&&c| c).count())
            .sum()
    }

    pub fn rows(&self) -> &[[bool; COLS]; ROWS] {
        &self.cells
    }
}

/// Reject anything but exactly 16 rows of 32 cells. The reported column count
/// is the first offending row's length.
pub(crate) fn check_shape<R: AsRef<[bool]>>(rows: &[R], stage: &'static str) -> Result<(), P10Error> {
    let actual_cols = rows
        .iter()
        .map(|r| r.as_ref().len())
        .find(|&len| len != COLS)
        .unwrap_or(COLS);
    if rows.len() != ROWS || actual_cols != COLS {
        return Err(P10Error::shape(stage, (ROWS, COLS), (rows.len(), actual_cols)));
    }
    Ok(())
}

fn parse_cell(c: char) -> Option<bool> {
    match c {
        '#' | 'X' | 'x' | '*' | '1' => Some(true),
        '.' | '0' | '-' | '_' | ' ' => Some(false),
        _ => None,
    }
}

/// Text pattern: 16 lines of 32 cells. Lines starting with `;` are comments.
/// Whitespace-only lines are skipped wherever they appear, unless they are
/// exactly 32 wide, in which case they are a row of spaces (all off).
impl FromStr for PixelGrid {
    type Err = P10Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<bool>> = Vec::with_capacity(ROWS);

        for (idx, line) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim_end_matches('\r');
            if line.starts_with(';') {
                continue;
            }
            if line.trim().is_empty() && line.chars().count() != COLS {
                continue;
            }

            let row = line
                .chars()
                .map(|c| {
                    parse_cell(c)
                        .ok_or_else(|| P10Error::pattern(line_no, format!("invalid cell '{}'", c)))
                })
                .collect::<Result<Vec<bool>, P10Error>>()?;

            if row.len() != COLS {
                return Err(P10Error::pattern(
                    line_no,
                    format!("expected {} cells, found {}", COLS, row.len()),
                ));
            }
            rows.push(row);
        }

        PixelGrid::from_rows(&rows)
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &cell in row {
                f.write_str(if cell { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
