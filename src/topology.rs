//! Peer topology for the constraint-propagation engine.
//!
//! A topology is computed once per [`Size`] and shared read-only between
//! solver instances — typically behind an [`Arc`](std::sync::Arc) so that
//! independent puzzles of the same size can be solved concurrently without
//! rebuilding it.

use crate::grid::Size;

/// The row, column and box groups of a grid, plus the reverse maps from each
/// cell to its groups and to its peer cells.
///
/// Cells are indexed row-major in `0..N²`. Units are indexed `0..3N`: rows
/// first, then columns, then boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    size: Size,
    units: Vec<Vec<usize>>,
    units_of: Vec<[usize; 3]>,
    peers: Vec<Vec<usize>>,
}

impl Topology {
    /// Compute the topology for one grid size.
    pub fn new(size: Size) -> Self {
        let units_count = size.units();
        let cells = size.cell_count();

        let mut units = vec![Vec::with_capacity(units_count); 3 * units_count];
        let mut units_of = Vec::with_capacity(cells);
        for row in 0..units_count {
            for column in 0..units_count {
                let cell = row * units_count + column;
                let of = [
                    row,
                    units_count + column,
                    2 * units_count + size.box_of(row, column),
                ];
                for unit in of {
                    units[unit].push(cell);
                }
                units_of.push(of);
            }
        }

        // Peers are the union of a cell's three units, minus the cell itself,
        // deduplicated in first-seen order.
        let mut peers = Vec::with_capacity(cells);
        let mut seen = vec![false; cells];
        for cell in 0..cells {
            let mut cell_peers = Vec::new();
            for &unit in &units_of[cell] {
                for &other in &units[unit] {
                    if other != cell && !seen[other] {
                        seen[other] = true;
                        cell_peers.push(other);
                    }
                }
            }
            for &peer in &cell_peers {
                seen[peer] = false;
            }
            peers.push(cell_peers);
        }

        Topology {
            size,
            units,
            units_of,
            peers,
        }
    }

    /// The grid size this topology was built for.
    pub fn size(&self) -> Size {
        self.size
    }

    /// All `3N` unit groups: rows, then columns, then boxes.
    pub fn units(&self) -> &[Vec<usize>] {
        &self.units
    }

    /// The three units the given cell belongs to.
    pub fn units_of(&self, cell: usize) -> &[usize; 3] {
        &self.units_of[cell]
    }

    /// Every cell sharing a unit with the given cell, excluding the cell
    /// itself.
    pub fn peers(&self, cell: usize) -> &[usize] {
        &self.peers[cell]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_topology_has_classic_shape() {
        let topology = Topology::new(Size::Nine);

        assert_eq!(topology.units().len(), 27);
        assert!(topology.units().iter().all(|unit| unit.len() == 9));

        // Every cell sits in one row, one column and one box, and sees 20
        // distinct peers.
        for cell in 0..81 {
            assert_eq!(topology.units_of(cell).len(), 3);
            assert_eq!(topology.peers(cell).len(), 20, "cell {cell}");
            assert!(!topology.peers(cell).contains(&cell));
        }
    }

    #[test]
    fn peer_counts_follow_box_shape() {
        // Peers: (N - 1) in the row, (N - 1) in the column, plus box cells
        // sharing neither the row nor the column.
        for (size, expected) in [
            (Size::Nine, 20),
            (Size::Ten, 22),
            (Size::Twelve, 28),
            (Size::Sixteen, 39),
        ] {
            let topology = Topology::new(size);
            let units = size.units();
            let in_box = units - size.box_rows() - size.box_cols() + 1;
            assert_eq!(expected, 2 * (units - 1) + in_box);
            for cell in 0..size.cell_count() {
                assert_eq!(topology.peers(cell).len(), expected, "{size:?} {cell}");
            }
        }
    }

    #[test]
    fn units_of_agrees_with_unit_membership() {
        let topology = Topology::new(Size::Twelve);
        for cell in 0..Size::Twelve.cell_count() {
            for &unit in topology.units_of(cell) {
                assert!(topology.units()[unit].contains(&cell));
            }
        }
    }

    #[test]
    fn peer_relation_is_symmetric() {
        let topology = Topology::new(Size::Ten);
        for cell in 0..Size::Ten.cell_count() {
            for &peer in topology.peers(cell) {
                assert!(topology.peers(peer).contains(&cell));
            }
        }
    }
}
