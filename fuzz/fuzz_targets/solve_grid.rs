#![no_main]

use libfuzzer_sys::fuzz_target;
use sudoku_solver::{csp::Csp, dlx::DlxSolver, Grid, Size, Technique};

#[derive(Debug)]
struct GridInput {
    cells: Vec<u8>,
}

impl<'a> arbitrary::Arbitrary<'a> for GridInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let cells = u
            .arbitrary::<[u8; 81]>()?
            .into_iter()
            .map(|value| value % 10)
            .collect();

        Ok(GridInput { cells })
    }
}

fuzz_target!(|data: GridInput| {
    let mut grid = Grid::empty(Size::Nine);
    for (index, value) in data.cells.iter().copied().enumerate() {
        grid.set(index / 9, index % 9, value);
    }

    let mut csp = Csp::new(Size::Nine);
    let mut dlx = match DlxSolver::new(Size::Nine) {
        Ok(solver) => solver,
        Err(_) => return,
    };

    let csp_outcome = csp.solve(&grid);
    let dlx_outcome = dlx.solve(&grid);

    // The engines must agree on whether the grid is solvable, and any
    // solution must be a valid completion of the clues.
    assert_eq!(csp_outcome.is_ok(), dlx_outcome.is_ok());
    for outcome in [csp_outcome, dlx_outcome] {
        if let Ok(solved) = outcome {
            assert!(solved.is_solved());
            for row in 0..9 {
                for column in 0..9 {
                    let clue = grid.get(row, column);
                    if clue != 0 {
                        assert_eq!(solved.get(row, column), clue);
                    }
                }
            }
        }
    }
});
