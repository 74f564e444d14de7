#![deny(missing_docs)]

//! Solvers for [Sudoku](https://en.wikipedia.org/wiki/Sudoku) puzzles of side
//! 9, 10, 12 and 16, built around two interchangeable engines: a
//! constraint-propagation backtracking search ([`csp`]) and
//! [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) over a
//! [dancing-links](https://en.wikipedia.org/wiki/Dancing_Links) matrix
//! ([`dlx`]).
//!
//! Both engines implement the same [`Technique`] contract: given a validated
//! [`Grid`], either return a separate fully solved grid or report why none
//! exists.
//!
//! ```
//! use sudoku_solver::{csp::Csp, dlx::DlxSolver, Grid, Size, Technique};
//!
//! let grid = Grid::empty(Size::Nine);
//!
//! let mut csp = Csp::new(Size::Nine);
//! let mut dlx = DlxSolver::new(Size::Nine).unwrap();
//!
//! let from_csp = csp.solve(&grid).unwrap();
//! let from_dlx = dlx.solve(&grid).unwrap();
//! assert!(from_csp.is_solved());
//! assert!(from_dlx.is_solved());
//! ```

pub mod csp;
pub mod dlx;
pub mod grid;
pub mod topology;

pub use grid::{Error, Grid, Size};
pub use topology::Topology;

/// A solving technique: consumes a grid by reference and produces a separate
/// solved grid, or an [`Error`] explaining why the puzzle was rejected.
///
/// Invalid clues ([`Error::InvalidClue`]) are reported before any search is
/// attempted; [`Error::Unsolvable`] only after exhaustive search. Techniques
/// take `&mut self` because an engine may reuse internal state across calls,
/// but a successful or failed solve never leaks state into the next one.
pub trait Technique {
    /// Solve one puzzle.
    fn solve(&mut self, grid: &Grid) -> Result<Grid, Error>;
}
