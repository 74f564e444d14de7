//! The puzzle grid model shared by both solving engines: supported sizes and
//! their box divisors, the cell array, and clue validation.

use core::fmt;
use std::error;

/// Supported puzzle side lengths, each with a fixed box-division factor pair.
///
/// A box spans `box_rows()` rows × `box_cols()` columns, so every box holds
/// exactly `units()` cells and forms one uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Size {
    /// Classic 9×9 puzzle with 3×3 boxes.
    Nine,
    /// 10×10 puzzle with boxes of 5 rows × 2 columns.
    Ten,
    /// 12×12 puzzle with boxes of 3 rows × 4 columns.
    Twelve,
    /// 16×16 puzzle with 4×4 boxes.
    Sixteen,
}

impl Size {
    /// The side length of the grid, which is also the number of distinct
    /// values a cell may hold.
    pub const fn units(self) -> usize {
        match self {
            Size::Nine => 9,
            Size::Ten => 10,
            Size::Twelve => 12,
            Size::Sixteen => 16,
        }
    }

    /// Number of grid rows a box spans.
    pub const fn box_rows(self) -> usize {
        match self {
            Size::Nine => 3,
            Size::Ten => 5,
            Size::Twelve => 3,
            Size::Sixteen => 4,
        }
    }

    /// Number of grid columns a box spans.
    pub const fn box_cols(self) -> usize {
        match self {
            Size::Nine => 3,
            Size::Ten => 2,
            Size::Twelve => 4,
            Size::Sixteen => 4,
        }
    }

    /// Total number of cells in the grid.
    pub const fn cell_count(self) -> usize {
        self.units() * self.units()
    }

    /// Index of the box containing `(row, column)`, numbered row-major from
    /// the top-left box. There are always `units()` boxes.
    pub const fn box_of(self, row: usize, column: usize) -> usize {
        (row / self.box_rows()) * (self.units() / self.box_cols()) + column / self.box_cols()
    }
}

impl TryFrom<usize> for Size {
    type Error = Error;

    fn try_from(units: usize) -> Result<Self, Error> {
        match units {
            9 => Ok(Size::Nine),
            10 => Ok(Size::Ten),
            12 => Ok(Size::Twelve),
            16 => Ok(Size::Sixteen),
            other => Err(Error::UnsupportedSize(other)),
        }
    }
}

/// Ways a puzzle can be rejected by the solving engines.
///
/// An invalid clue is reported distinctly from an unsolvable grid: the former
/// is detected before any search is attempted, the latter only after
/// exhaustive search has found no completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A given value is repeated within a row, column or box, or lies outside
    /// `1..=N`. Positions are zero-indexed.
    InvalidClue {
        /// Row of the offending clue.
        row: usize,
        /// Column of the offending clue.
        column: usize,
        /// The clue value.
        value: u8,
    },
    /// The grid is well formed but admits no valid completion.
    Unsolvable,
    /// The requested side length is not one of 9, 10, 12 or 16.
    UnsupportedSize(usize),
    /// A constraint column of the exact-cover matrix ended up with no
    /// candidate rows during construction.
    MalformedMatrix,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidClue { row, column, value } => write!(
                f,
                "repeated or invalid value '{}' in puzzle at row: {}, column: {}",
                value,
                row + 1,
                column + 1
            ),
            Error::Unsolvable => write!(f, "puzzle has no solution"),
            Error::UnsupportedSize(units) => {
                write!(f, "unsupported grid size '{units}', expected 9, 10, 12 or 16")
            }
            Error::MalformedMatrix => {
                write!(f, "exact-cover matrix has an empty constraint column")
            }
        }
    }
}

impl error::Error for Error {}

/// An N×N puzzle grid. A cell holds `0` while unfilled, otherwise a value in
/// `1..=N`.
///
/// Solvers take a grid by reference and produce a separate solved grid; the
/// input is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: Size,
    cells: Vec<u8>,
}

impl Grid {
    /// Create a grid with every cell unfilled.
    pub fn empty(size: Size) -> Self {
        Grid {
            size,
            cells: vec![0; size.cell_count()],
        }
    }

    /// Build a grid from row-major rows of values.
    ///
    /// Fails with [`Error::UnsupportedSize`] if the shape is not a supported
    /// N×N square, and with [`Error::InvalidClue`] if any value lies outside
    /// `0..=N`.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, Error> {
        let size = Size::try_from(rows.len())?;
        let units = size.units();

        let mut cells = Vec::with_capacity(size.cell_count());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != units {
                return Err(Error::UnsupportedSize(values.len()));
            }
            for (column, &value) in values.iter().enumerate() {
                if usize::from(value) > units {
                    return Err(Error::InvalidClue { row, column, value });
                }
                cells.push(value);
            }
        }

        Ok(Grid { size, cells })
    }

    /// The size this grid was built for.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Value at `(row, column)`; `0` means unfilled.
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.cells[row * self.size.units() + column]
    }

    /// Set the value at `(row, column)`.
    pub fn set(&mut self, row: usize, column: usize, value: u8) {
        debug_assert!(usize::from(value) <= self.size.units());
        self.cells[row * self.size.units() + column] = value;
    }

    /// True if no cell is unfilled.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    /// True if the grid is complete and every row, column and box holds a
    /// permutation of `1..=N`.
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.validate_clues().is_ok()
    }

    /// Check every given (non-zero) value for range errors and duplicates
    /// within its row, column and box.
    ///
    /// Both engines call this before attempting any search, so invalid input
    /// is reported identically and no solve is attempted on it. The reported
    /// position is the second occurrence of a duplicated value.
    pub fn validate_clues(&self) -> Result<(), Error> {
        let units = self.size.units();

        // One seen-marker row per unit: rows, then columns, then boxes.
        let mut seen = vec![false; 3 * units * units];
        for row in 0..units {
            for column in 0..units {
                let value = self.get(row, column);
                if value == 0 {
                    continue;
                }
                let invalid = Error::InvalidClue { row, column, value };
                if usize::from(value) > units {
                    return Err(invalid);
                }

                let slot = usize::from(value) - 1;
                let units_of = [
                    row,
                    units + column,
                    2 * units + self.size.box_of(row, column),
                ];
                for unit in units_of {
                    let index = unit * units + slot;
                    if seen[index] {
                        return Err(invalid);
                    }
                    seen[index] = true;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.size.units();
        let width = if units > 9 { 2 } else { 1 };
        for row in 0..units {
            for column in 0..units {
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", self.get(row, column))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
