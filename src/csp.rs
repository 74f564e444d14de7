//! Constraint-propagation engine.
//!
//! Each cell carries a set of candidate values. Assigning a value eliminates
//! every other candidate from the cell; each elimination cascades in two
//! directions: a cell reduced to a single candidate eliminates that value
//! from all of its peers, and a unit reduced to a single possible slot for a
//! value forces that assignment. When propagation stalls, the search clones
//! the whole solver state and branches on the cell with the fewest
//! candidates, so a failed branch never has to be undone.

use std::sync::Arc;

use crate::{
    grid::{Error, Grid, Size},
    topology::Topology,
    Technique,
};

/// Candidate set for a single cell: bit `v - 1` is set while value `v` is
/// still possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidates {
    mask: u16,
}

impl Candidates {
    fn all(size: Size) -> Self {
        let units = size.units();
        let mask = if units == u16::BITS as usize {
            u16::MAX
        } else {
            (1 << units) - 1
        };
        Candidates { mask }
    }

    /// True while `value` has not been eliminated.
    pub fn is_on(self, value: u8) -> bool {
        self.mask >> (value - 1) & 1 == 1
    }

    /// Number of candidates remaining. Zero is a contradiction; a solved cell
    /// has exactly one.
    pub fn count(self) -> usize {
        self.mask.count_ones() as usize
    }

    /// The smallest candidate still on, if any. For a solved cell this is the
    /// cell's value.
    pub fn value(self) -> Option<u8> {
        if self.mask == 0 {
            None
        } else {
            Some(self.mask.trailing_zeros() as u8 + 1)
        }
    }

    /// Iterate over the remaining candidates in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=u16::BITS as u8).filter(move |&value| self.mask >> (value - 1) & 1 == 1)
    }

    fn eliminate(&mut self, value: u8) {
        self.mask &= !(1 << (value - 1));
    }
}

/// Solver state for one puzzle: the candidate set of every cell plus the
/// shared peer topology.
///
/// Construction assigns every given clue, cascading eliminations to a fixed
/// point. Each branch of the search operates on an independent clone, which
/// is what makes backtracking safe without undo logic.
#[derive(Debug, Clone)]
pub struct CspSolver {
    cells: Vec<Candidates>,
    topology: Arc<Topology>,
    valid: bool,
}

impl CspSolver {
    /// Build a solver from a grid and immediately assign all of its clues.
    ///
    /// Duplicate or out-of-range clues are rejected before any propagation.
    /// If the clues are individually fine but propagation derives a
    /// contradiction, the solver is returned with [`is_valid`] false.
    ///
    /// [`is_valid`]: CspSolver::is_valid
    pub fn new(grid: &Grid, topology: Arc<Topology>) -> Result<Self, Error> {
        debug_assert_eq!(grid.size(), topology.size());
        grid.validate_clues()?;

        let size = grid.size();
        let units = size.units();
        let mut solver = CspSolver {
            cells: vec![Candidates::all(size); size.cell_count()],
            topology,
            valid: true,
        };

        'assign: for row in 0..units {
            for column in 0..units {
                let value = grid.get(row, column);
                if value != 0 && !solver.assign(row * units + column, value) {
                    solver.valid = false;
                    break 'assign;
                }
            }
        }

        Ok(solver)
    }

    /// False if propagation has derived a contradiction from the clues.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True once every cell has exactly one candidate left.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|cell| cell.count() == 1)
    }

    /// The candidate set of a cell.
    pub fn candidates(&self, cell: usize) -> Candidates {
        self.cells[cell]
    }

    /// The undecided cell with the fewest (but more than one) candidates,
    /// ties broken by first occurrence in scan order. `None` once no such
    /// cell exists.
    pub fn least_count(&self) -> Option<usize> {
        let mut best = None;
        let mut best_count = 0;
        for (cell, candidates) in self.cells.iter().enumerate() {
            let count = candidates.count();
            if count > 1 && (best.is_none() || count < best_count) {
                best = Some(cell);
                best_count = count;
            }
        }
        best
    }

    /// Fix `cell` to `value` by eliminating every other candidate. Returns
    /// false if a contradiction is reached.
    pub fn assign(&mut self, cell: usize, value: u8) -> bool {
        let units = self.topology.size().units() as u8;
        for other in 1..=units {
            if other != value && !self.eliminate(cell, other) {
                return false;
            }
        }
        true
    }

    /// Remove `value` from the candidates of `cell`, cascading the two
    /// Norvig inferences. Returns false on contradiction, at which point the
    /// state is no longer consistent and must be discarded.
    fn eliminate(&mut self, cell: usize, value: u8) -> bool {
        if !self.cells[cell].is_on(value) {
            return true;
        }
        self.cells[cell].eliminate(value);

        let topology = Arc::clone(&self.topology);
        match self.cells[cell].count() {
            0 => return false,
            1 => {
                // Down to a single candidate: no peer can hold it.
                let forced = match self.cells[cell].value() {
                    Some(forced) => forced,
                    None => return false,
                };
                for &peer in topology.peers(cell) {
                    if !self.eliminate(peer, forced) {
                        return false;
                    }
                }
            }
            _ => {}
        }

        // If a unit of this cell now has a single remaining slot for `value`,
        // that slot must take it.
        for &unit in topology.units_of(cell) {
            let mut remaining = 0;
            let mut slot = 0;
            for &member in &topology.units()[unit] {
                if self.cells[member].is_on(value) {
                    remaining += 1;
                    slot = member;
                }
            }
            match remaining {
                0 => return false,
                1 => {
                    if !self.assign(slot, value) {
                        return false;
                    }
                }
                _ => {}
            }
        }

        true
    }

    /// Extract the current assignment into a grid. Only meaningful once the
    /// solver is solved.
    pub fn to_grid(&self) -> Grid {
        let units = self.topology.size().units();
        let mut grid = Grid::empty(self.topology.size());
        for cell in 0..self.cells.len() {
            if let Some(value) = self.cells[cell].value() {
                grid.set(cell / units, cell % units, value);
            }
        }
        grid
    }
}

fn search(solver: CspSolver) -> Option<CspSolver> {
    if !solver.is_valid() {
        return None;
    }
    let cell = match solver.least_count() {
        Some(cell) => cell,
        // Valid with no branchable cell left means every cell is down to one
        // candidate.
        None => return Some(solver),
    };

    for value in solver.candidates(cell).iter() {
        let mut branch = solver.clone();
        if branch.assign(cell, value) {
            if let Some(solved) = search(branch) {
                return Some(solved);
            }
        }
    }
    None
}

/// The constraint-propagation solving technique.
///
/// Holds the shared peer topology; cloning is cheap and clones share the
/// topology, so one value can serve concurrent solves of different puzzles.
#[derive(Debug, Clone)]
pub struct Csp {
    topology: Arc<Topology>,
}

impl Csp {
    /// Create a technique for one grid size, computing its topology.
    pub fn new(size: Size) -> Self {
        Csp {
            topology: Arc::new(Topology::new(size)),
        }
    }

    /// Create a technique around an existing shared topology.
    pub fn with_topology(topology: Arc<Topology>) -> Self {
        Csp { topology }
    }
}

impl Technique for Csp {
    fn solve(&mut self, grid: &Grid) -> Result<Grid, Error> {
        let solver = CspSolver::new(grid, Arc::clone(&self.topology))?;
        match search(solver) {
            Some(solved) => {
                log::debug!("csp: solved {}x{} puzzle", grid.size().units(), grid.size().units());
                Ok(solved.to_grid())
            }
            None => {
                log::debug!("csp: search exhausted without a solution");
                Err(Error::Unsolvable)
            }
        }
    }
}
