use sudoku_solver::{Grid, Size};

/// Parse a 9×9 puzzle from an 81-character string.
///
/// # Expected Format
///  - `0` denotes an empty cell
///  - The digits are presented in row-major order: the first nine characters
///    are the first row, the next nine the second row, etc.
///
/// # Panics
///  - If the string is not exactly 81 characters
///  - If any character is not `[0-9]`
#[allow(dead_code)]
pub fn parse_grid(input: &str) -> Grid {
    assert_eq!(input.len(), 81, "Input needs to be 81 characters long.");

    let mut grid = Grid::empty(Size::Nine);
    for (index, character) in input.char_indices() {
        let value = character
            .to_digit(10)
            .unwrap_or_else(|| panic!("Invalid digit [{character}] at index [{index}]."));
        grid.set(index / 9, index % 9, value as u8);
    }
    grid
}

/// Format a 9×9 grid into the string format of `parse_grid`.
#[allow(dead_code)]
pub fn format_grid(grid: &Grid) -> String {
    assert_eq!(grid.size(), Size::Nine);

    (0..81)
        .map(|index| {
            char::from_digit(u32::from(grid.get(index / 9, index % 9)), 10).unwrap()
        })
        .collect()
}

/// Build a fully solved grid of any supported size from the classic shifted
/// pattern: each row is the previous row rotated by `box_cols`, with an extra
/// step of one when crossing a box-row boundary.
#[allow(dead_code)]
pub fn pattern_solved(size: Size) -> Grid {
    let units = size.units();
    let mut grid = Grid::empty(size);
    for row in 0..units {
        let shift = row * size.box_cols() + row / size.box_rows();
        for column in 0..units {
            grid.set(row, column, ((shift + column) % units) as u8 + 1);
        }
    }
    assert!(grid.is_solved(), "pattern generator produced a bad grid");
    grid
}

/// Assert that `solved` is a valid completion of `original`: complete, every
/// row/column/box a permutation of `1..=N`, and every given clue preserved.
#[allow(dead_code)]
pub fn assert_valid_solution(original: &Grid, solved: &Grid) {
    assert_eq!(original.size(), solved.size());
    let units = original.size().units();

    assert!(solved.is_complete(), "solution has unfilled cells");
    assert!(
        solved.validate_clues().is_ok(),
        "solution repeats a value within a unit"
    );

    for row in 0..units {
        for column in 0..units {
            let given = original.get(row, column);
            if given != 0 {
                assert_eq!(
                    solved.get(row, column),
                    given,
                    "clue at ({row}, {column}) was not preserved"
                );
            }
        }
    }
}
