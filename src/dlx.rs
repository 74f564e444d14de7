//! Exact-cover engine: Algorithm X over a dancing-links matrix.
//!
//! The puzzle is encoded with one matrix column per constraint and one matrix
//! row per candidate `(row, column, value)` placement. The four constraint
//! families — row-has-value, column-has-value, cell-is-filled and
//! box-has-value — each contribute N² columns, and every placement row holds
//! exactly one node in each family, linked into a small horizontal cycle.
//!
//! The whole structure lives in a single arena of nodes addressed by index;
//! cover and uncover splice nodes out of and back into circular doubly linked
//! lists in O(1) per node, and no node is ever allocated or freed during
//! search.

use crate::{
    grid::{Error, Grid, Size},
    Technique,
};

/// A candidate placement of one value into one cell, zero-indexed positions
/// and a value in `1..=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Grid row of the placement.
    pub row: usize,
    /// Grid column of the placement.
    pub column: usize,
    /// The value placed.
    pub value: u8,
}

/// One member of the toroidal structure. Column headers are the nodes in
/// `1..=4N²`; index 0 is the root sentinel anchoring the header cycle.
///
/// Invariant, restored by every cover/uncover pair: for each linked node,
/// `nodes[nodes[i].left].right == i` and likewise for the other three
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    /// Header index of the column this node belongs to; headers and the root
    /// point at themselves.
    column: usize,
    /// Number of rows currently linked below this node. Maintained for
    /// headers only.
    len: usize,
    /// Source placement; unused for headers and the root.
    placement: Placement,
}

impl Node {
    fn unlinked(index: usize) -> Self {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            column: index,
            len: 0,
            placement: Placement::default(),
        }
    }
}

const ROOT: usize = 0;

/// Dancing-links solver for one grid size.
///
/// The matrix is built once by [`DlxSolver::new`] and reused across puzzles:
/// the covers applied for one puzzle's clues are exactly undone at the end of
/// each [`solve`](DlxSolver::solve) call, restoring the pristine matrix. A
/// single instance must not be shared between concurrent solves; the matrix
/// is mutated destructively during search.
#[derive(Debug, Clone)]
pub struct DlxSolver {
    size: Size,
    nodes: Vec<Node>,
    /// Chosen placement nodes: forced clue selections first, then search
    /// picks. Determines the output grid once solved.
    solution: Vec<usize>,
    solved: bool,
    effort: u64,
}

impl DlxSolver {
    /// Build the exact-cover matrix for one grid size: `4N²` constraint
    /// columns and `N³` placement rows of four nodes each.
    ///
    /// Fails with [`Error::MalformedMatrix`] if any constraint column ends up
    /// with no candidate rows.
    pub fn new(size: Size) -> Result<Self, Error> {
        let units = size.units();
        let columns = 4 * units * units;

        let mut nodes = Vec::with_capacity(1 + columns + 4 * units * units * units);
        nodes.push(Node::unlinked(ROOT));

        // Headers 1..=columns, linked into the horizontal cycle at the root.
        for header in 1..=columns {
            let mut node = Node::unlinked(header);
            node.left = header - 1;
            node.right = ROOT;
            nodes.push(node);
            nodes[header - 1].right = header;
        }
        nodes[ROOT].left = columns;

        let row_offset = 0;
        let column_offset = units * units;
        let cell_offset = 2 * units * units;
        let box_offset = 3 * units * units;

        let mut solver = DlxSolver {
            size,
            nodes,
            solution: Vec::with_capacity(size.cell_count()),
            solved: false,
            effort: 0,
        };

        for row in 0..units {
            for column in 0..units {
                for slot in 0..units {
                    let placement = Placement {
                        row,
                        column,
                        value: slot as u8 + 1,
                    };
                    let constraints = [
                        row_offset + row * units + slot,
                        column_offset + column * units + slot,
                        cell_offset + row * units + column,
                        box_offset + size.box_of(row, column) * units + slot,
                    ];

                    let first = solver.nodes.len();
                    for constraint in constraints {
                        solver.append_to_column(1 + constraint, placement);
                    }
                    // Horizontal cycle over the four family nodes.
                    for offset in 0..4 {
                        let index = first + offset;
                        solver.nodes[index].right = first + (offset + 1) % 4;
                        solver.nodes[index].left = first + (offset + 3) % 4;
                    }
                }
            }
        }

        if (1..=columns).any(|header| solver.nodes[header].len == 0) {
            return Err(Error::MalformedMatrix);
        }

        log::debug!(
            "dlx: built {}x{} matrix with {} columns and {} placement nodes",
            units,
            units,
            columns,
            solver.nodes.len() - columns - 1
        );

        Ok(solver)
    }

    /// Append a fresh node for `placement` at the bottom of a column.
    fn append_to_column(&mut self, header: usize, placement: Placement) {
        let index = self.nodes.len();
        let bottom = self.nodes[header].up;

        let mut node = Node::unlinked(index);
        node.up = bottom;
        node.down = header;
        node.column = header;
        node.placement = placement;
        self.nodes.push(node);

        self.nodes[bottom].down = index;
        self.nodes[header].up = index;
        self.nodes[header].len += 1;
    }

    /// Solve one puzzle: insert its clues as forced row selections, run the
    /// search, and restore the matrix afterwards.
    ///
    /// On success the returned grid is a separate, fully solved copy; the
    /// input grid is untouched.
    pub fn solve(&mut self, grid: &Grid) -> Result<Grid, Error> {
        debug_assert_eq!(grid.size(), self.size);
        grid.validate_clues()?;

        self.solved = false;
        self.effort = 0;
        self.solution.clear();

        let units = self.size.units();
        let mut clues = Vec::new();
        let mut outcome = Ok(());

        'insert: for row in 0..units {
            for column in 0..units {
                let value = grid.get(row, column);
                if value == 0 {
                    continue;
                }
                match self.find(row, column, value) {
                    Some(node) => {
                        self.cover(self.nodes[node].column);
                        let mut other = self.nodes[node].right;
                        while other != node {
                            self.cover(self.nodes[other].column);
                            other = self.nodes[other].right;
                        }
                        clues.push(node);
                        self.solution.push(node);
                    }
                    // The matching matrix row was hidden by an earlier clue
                    // sharing one of its constraints.
                    None => {
                        outcome = Err(Error::InvalidClue { row, column, value });
                        break 'insert;
                    }
                }
            }
        }

        if outcome.is_ok() {
            self.solved = self.search();
            if !self.solved {
                outcome = Err(Error::Unsolvable);
            }
        }

        // Undo the clue covers in reverse order to restore the pristine,
        // fully uncovered matrix for the next puzzle.
        for &node in clues.iter().rev() {
            let mut other = self.nodes[node].left;
            while other != node {
                self.uncover(self.nodes[other].column);
                other = self.nodes[other].left;
            }
            self.uncover(self.nodes[node].column);
        }

        log::debug!(
            "dlx: {} after visiting columns totalling {} rows",
            if self.solved { "solved" } else { "failed" },
            self.effort
        );

        match outcome {
            Ok(()) => Ok(self.to_grid()),
            Err(error) => {
                self.solution.clear();
                Err(error)
            }
        }
    }

    /// Whether the most recent [`solve`](DlxSolver::solve) found a solution.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Sum of the sizes of the columns chosen during the most recent search,
    /// a rough measure of how contested the search was.
    pub fn effort(&self) -> u64 {
        self.effort
    }

    /// Drain-free extraction: write every chosen placement into a grid.
    fn to_grid(&self) -> Grid {
        let mut grid = Grid::empty(self.size);
        for &node in &self.solution {
            let placement = self.nodes[node].placement;
            grid.set(placement.row, placement.column, placement.value);
        }
        grid
    }

    /// Depth-first Algorithm X. Stops at the first full cover; every cover
    /// performed on the way is undone before returning, so only the clue
    /// covers remain afterwards.
    fn search(&mut self) -> bool {
        let header = match self.pick_next_col() {
            Some(header) => header,
            // No uncovered columns left: every constraint is satisfied.
            None => return true,
        };
        if self.nodes[header].len == 0 {
            return false;
        }
        self.effort += self.nodes[header].len as u64;

        self.cover(header);
        let mut solved = false;
        let mut row = self.nodes[header].down;
        while row != header && !solved {
            self.solution.push(row);
            let mut other = self.nodes[row].right;
            while other != row {
                self.cover(self.nodes[other].column);
                other = self.nodes[other].right;
            }

            solved = self.search();
            if !solved {
                self.solution.pop();
            }

            let mut other = self.nodes[row].left;
            while other != row {
                self.uncover(self.nodes[other].column);
                other = self.nodes[other].left;
            }

            row = self.nodes[row].down;
        }
        self.uncover(header);

        solved
    }

    /// The uncovered column with the fewest rows, ties broken by horizontal
    /// scan order. `None` once no columns remain.
    fn pick_next_col(&self) -> Option<usize> {
        let mut best = None;
        let mut best_len = 0;
        let mut header = self.nodes[ROOT].right;
        while header != ROOT {
            let len = self.nodes[header].len;
            if best.is_none() || len < best_len {
                best = Some(header);
                best_len = len;
            }
            header = self.nodes[header].right;
        }
        best
    }

    /// Remove a column from the header cycle and hide every other node of
    /// every row in it from their own columns. The rows' horizontal links are
    /// left untouched, so the rows are reserved rather than deleted.
    fn cover(&mut self, header: usize) {
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row = self.nodes[header].down;
        while row != header {
            let mut other = self.nodes[row].right;
            while other != row {
                let (up, down) = (self.nodes[other].up, self.nodes[other].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                let column = self.nodes[other].column;
                self.nodes[column].len -= 1;
                other = self.nodes[other].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Exact structural inverse of [`cover`](DlxSolver::cover): walks the
    /// column bottom-up and each row right-to-left so nodes are re-inserted
    /// in the reverse of their removal order.
    fn uncover(&mut self, header: usize) {
        let mut row = self.nodes[header].up;
        while row != header {
            let mut other = self.nodes[row].left;
            while other != row {
                let column = self.nodes[other].column;
                self.nodes[column].len += 1;
                let (up, down) = (self.nodes[other].up, self.nodes[other].down);
                self.nodes[up].down = other;
                self.nodes[down].up = other;
                other = self.nodes[other].left;
            }
            row = self.nodes[row].up;
        }

        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Locate the placement row matching a clue triple among the uncovered
    /// part of the matrix. `None` means the clue conflicts with an earlier
    /// selection.
    fn find(&self, row: usize, column: usize, value: u8) -> Option<usize> {
        let mut header = self.nodes[ROOT].right;
        while header != ROOT {
            let mut node = self.nodes[header].down;
            while node != header {
                let placement = self.nodes[node].placement;
                if placement.row == row && placement.column == column && placement.value == value {
                    return Some(node);
                }
                node = self.nodes[node].down;
            }
            header = self.nodes[header].right;
        }
        None
    }
}

impl Technique for DlxSolver {
    fn solve(&mut self, grid: &Grid) -> Result<Grid, Error> {
        DlxSolver::solve(self, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_links_consistent(solver: &DlxSolver) {
        // Walk only the uncovered structure; hidden nodes may point at
        // neighbors that no longer point back.
        let mut header = solver.nodes[ROOT].right;
        while header != ROOT {
            let node = solver.nodes[header];
            assert_eq!(solver.nodes[node.left].right, header);
            assert_eq!(solver.nodes[node.right].left, header);

            let mut row = node.down;
            let mut counted = 0;
            while row != header {
                counted += 1;
                let row_node = solver.nodes[row];
                assert_eq!(solver.nodes[row_node.up].down, row);
                assert_eq!(solver.nodes[row_node.down].up, row);
                assert_eq!(solver.nodes[row_node.left].right, row);
                assert_eq!(solver.nodes[row_node.right].left, row);
                row = row_node.down;
            }
            assert_eq!(counted, node.len);

            header = node.right;
        }
    }

    #[test]
    fn matrix_has_expected_shape() {
        let solver = DlxSolver::new(Size::Nine).unwrap();
        // Root + 4 * 81 headers + 4 nodes per each of the 729 placements.
        assert_eq!(solver.nodes.len(), 1 + 324 + 4 * 729);
        // Every constraint column starts with nine candidate rows.
        for header in 1..=324 {
            assert_eq!(solver.nodes[header].len, 9);
        }
        assert_links_consistent(&solver);
    }

    #[test]
    fn matrix_builds_for_every_size() {
        for size in [Size::Nine, Size::Ten, Size::Twelve, Size::Sixteen] {
            let solver = DlxSolver::new(size).unwrap();
            let units = size.units();
            assert_eq!(
                solver.nodes.len(),
                1 + 4 * units * units + 4 * units * units * units
            );
            assert_links_consistent(&solver);
        }
    }

    #[test]
    fn cover_then_uncover_restores_every_link() {
        let mut solver = DlxSolver::new(Size::Nine).unwrap();
        let pristine = solver.nodes.clone();

        for header in [1, 57, 324] {
            solver.cover(header);
            assert_ne!(solver.nodes, pristine);
            solver.uncover(header);
            assert_eq!(solver.nodes, pristine, "header {header}");
        }

        // Nested covers must unwind in reverse order.
        solver.cover(1);
        solver.cover(100);
        solver.uncover(100);
        solver.uncover(1);
        assert_eq!(solver.nodes, pristine);
    }

    #[test]
    fn cover_hides_competing_rows() {
        let mut solver = DlxSolver::new(Size::Nine).unwrap();
        // Cover the cell-is-filled column for (0, 0); every placement for
        // that cell disappears from the row-has-value family.
        let cell_header = 1 + 2 * 81;
        solver.cover(cell_header);
        for slot in 0..9 {
            let row_header = 1 + slot;
            assert_eq!(solver.nodes[row_header].len, 8);
        }
        solver.uncover(cell_header);
        assert_links_consistent(&solver);
    }

    #[test]
    fn pick_next_col_breaks_ties_by_scan_order() {
        let solver = DlxSolver::new(Size::Nine).unwrap();
        // All columns start at the same size, so the first header wins.
        assert_eq!(solver.pick_next_col(), Some(1));
    }

    #[test]
    fn find_locates_each_triple_until_hidden() {
        let mut solver = DlxSolver::new(Size::Nine).unwrap();
        let node = solver.find(4, 7, 3).unwrap();
        assert_eq!(
            solver.nodes[node].placement,
            Placement {
                row: 4,
                column: 7,
                value: 3
            }
        );
        assert_eq!(solver.find(9, 0, 1), None);

        // Selecting the row for (4,7)=3 hides every conflicting triple.
        solver.cover(solver.nodes[node].column);
        let mut other = solver.nodes[node].right;
        while other != node {
            solver.cover(solver.nodes[other].column);
            other = solver.nodes[other].right;
        }
        assert_eq!(solver.find(4, 7, 3), None);
        assert_eq!(solver.find(4, 7, 5), None);
        assert_eq!(solver.find(4, 0, 3), None);
        assert!(solver.find(5, 0, 3).is_some());
    }

    #[test]
    fn solve_restores_pristine_matrix() {
        let mut solver = DlxSolver::new(Size::Nine).unwrap();
        let pristine = solver.nodes.clone();

        let mut grid = Grid::empty(Size::Nine);
        grid.set(0, 0, 5);
        grid.set(4, 4, 1);
        let solved = solver.solve(&grid).unwrap();
        assert!(solver.is_solved());
        assert!(solved.is_solved());
        assert_eq!(solver.nodes, pristine);

        // A rejected puzzle must also unwind its partial clue insertions.
        let mut duplicate = Grid::empty(Size::Nine);
        duplicate.set(0, 0, 5);
        duplicate.set(0, 7, 5);
        assert!(matches!(
            solver.solve(&duplicate),
            Err(Error::InvalidClue { .. })
        ));
        assert_eq!(solver.nodes, pristine);
    }

    #[test]
    fn effort_accumulates_during_search() {
        let mut solver = DlxSolver::new(Size::Nine).unwrap();
        let grid = Grid::empty(Size::Nine);
        solver.solve(&grid).unwrap();
        assert!(solver.effort() > 0);
    }
}
