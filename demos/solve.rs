//! Solve a single 9×9 puzzle from the command line.
//! Usage:
//!
//! ```bash
//! cargo run --release --example solve -- 006008047000607200304009060003100005010020480740005009020930600081000034905006170
//! cargo run --release --example solve -- --dlx --time 006008047000607200304009060003100005010020480740005009020930600081000034905006170
//! ```
//!
//! `--csp` (the default) selects the constraint-propagation engine, `--dlx`
//! the dancing-links engine, and `--time` prints the processing time.

use std::time::Instant;

use sudoku_solver::{csp::Csp, dlx::DlxSolver, Grid, Size, Technique};

fn parse(problem: &str) -> Option<Grid> {
    if problem.len() != 9 * 9 {
        return None;
    }

    let mut grid = Grid::empty(Size::Nine);
    for (index, character) in problem.char_indices() {
        let value = character.to_digit(10)?;
        grid.set(index / 9, index % 9, value as u8);
    }
    Some(grid)
}

fn main() {
    env_logger::init();

    let mut use_dlx = false;
    let mut print_time = false;
    let mut problem = None;
    for argument in std::env::args().skip(1) {
        match argument.as_str() {
            "--dlx" => use_dlx = true,
            "--csp" => use_dlx = false,
            "--time" => print_time = true,
            other => problem = Some(other.to_owned()),
        }
    }

    let Some(problem) = problem else {
        eprintln!("problem needed");
        std::process::exit(1);
    };
    let Some(grid) = parse(&problem) else {
        eprintln!("invalid problem format");
        std::process::exit(1);
    };

    let mut technique: Box<dyn Technique> = if use_dlx {
        match DlxSolver::new(Size::Nine) {
            Ok(solver) => Box::new(solver),
            Err(error) => {
                eprintln!("could not initialize dlx solver: {error}");
                std::process::exit(1);
            }
        }
    } else {
        Box::new(Csp::new(Size::Nine))
    };

    let start = Instant::now();
    let outcome = technique.solve(&grid);
    let elapsed = start.elapsed();

    match outcome {
        Ok(solved) => {
            print!("{solved}");
            if print_time {
                println!("Processing time: {} s", elapsed.as_secs_f64());
            }
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
