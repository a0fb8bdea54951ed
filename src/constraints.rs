//! Encoding of the N-queens rules as a single BDD.
//!
//! The formula is the conjunction of two families of constraints:
//!
//! - **exclusion**: for every cell, either it is empty, or it holds a queen and
//!   every cell attacked from it (same row, same column, both diagonals) is empty;
//! - **row coverage**: every row `x` holds at least one queen.
//!
//! Together they admit exactly the placements of `size` non-attacking queens.
//! Each line of attack is built by its own function, so the diagonal walks can
//! be checked in isolation.

use log::debug;

use crate::bdd::Bdd;
use crate::index::{variable_index, Cell};
use crate::reference::Ref;

/// The two diagonal directions through a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Diagonal {
    /// `x - y` is constant along the line.
    Slash,
    /// `x + y` is constant along the line.
    Backslash,
}

/// All cells of the diagonal through `cell`, clipped to the board,
/// including `cell` itself.
///
/// The walk starts at the board edge (the ray is normalized first), so the whole
/// line is covered no matter where `cell` sits on it.
pub fn diagonal_cells(size: usize, cell: Cell, diagonal: Diagonal) -> Vec<Cell> {
    let mut cells = Vec::new();
    match diagonal {
        Diagonal::Slash => {
            let normalize = cell.x.min(cell.y);
            let (mut x, mut y) = (cell.x - normalize, cell.y - normalize);
            while x < size && y < size {
                cells.push(Cell::new(x, y));
                x += 1;
                y += 1;
            }
        }
        Diagonal::Backslash => {
            let normalize = (size - 1 - cell.x).min(cell.y);
            let (mut x, mut y) = (cell.x + normalize, cell.y - normalize);
            loop {
                cells.push(Cell::new(x, y));
                if x == 0 || y + 1 >= size {
                    break;
                }
                x -= 1;
                y += 1;
            }
        }
    }
    cells
}

/// Conjunction of "no queen at c" over `cells`, skipping `cell` itself.
fn unoccupied(bdd: &Bdd, size: usize, cell: Cell, cells: impl IntoIterator<Item = Cell>) -> Ref {
    bdd.apply_and_many(
        cells
            .into_iter()
            .filter(|&c| c != cell)
            .map(|c| bdd.mk_not_var(variable_index(size, c))),
    )
}

/// No other queen in the row of `cell` (cells sharing its `x`).
pub fn row_restriction(bdd: &Bdd, size: usize, cell: Cell) -> Ref {
    unoccupied(bdd, size, cell, (0..size).map(|y| Cell::new(cell.x, y)))
}

/// No other queen in the column of `cell` (cells sharing its `y`).
pub fn column_restriction(bdd: &Bdd, size: usize, cell: Cell) -> Ref {
    unoccupied(bdd, size, cell, (0..size).map(|x| Cell::new(x, cell.y)))
}

pub fn slash_diagonal_restriction(bdd: &Bdd, size: usize, cell: Cell) -> Ref {
    unoccupied(bdd, size, cell, diagonal_cells(size, cell, Diagonal::Slash))
}

pub fn backslash_diagonal_restriction(bdd: &Bdd, size: usize, cell: Cell) -> Ref {
    unoccupied(bdd, size, cell, diagonal_cells(size, cell, Diagonal::Backslash))
}

/// `q → unoccupied` (equivalently `¬q ∨ (q ∧ unoccupied)`), where `q` is the
/// variable of `cell` and `unoccupied` forbids queens on every cell it attacks.
pub fn square_rule(bdd: &Bdd, size: usize, cell: Cell) -> Ref {
    let unoccupied = bdd.apply_and_many([
        row_restriction(bdd, size, cell),
        column_restriction(bdd, size, cell),
        slash_diagonal_restriction(bdd, size, cell),
        backslash_diagonal_restriction(bdd, size, cell),
    ]);
    let queen = bdd.mk_var(variable_index(size, cell));
    bdd.apply_imply(queen, unoccupied)
}

/// Conjunction of [`square_rule`] over every cell.
pub fn exclusion_rule(bdd: &Bdd, size: usize) -> Ref {
    bdd.apply_and_many(Cell::all(size).map(|cell| square_rule(bdd, size, cell)))
}

/// At least one queen in every row.
pub fn row_coverage_rule(bdd: &Bdd, size: usize) -> Ref {
    bdd.apply_and_many((0..size).map(|x| {
        bdd.apply_or_many((0..size).map(|y| bdd.mk_var(variable_index(size, Cell::new(x, y)))))
    }))
}

/// The complete N-queens formula for a `size`x`size` board.
///
/// The manager's variable universe must already hold `size * size` variables.
pub fn queens_formula(bdd: &Bdd, size: usize) -> Ref {
    let exclusion = exclusion_rule(bdd, size);
    debug!("exclusion rule of size {}", bdd.size(exclusion));
    let coverage = row_coverage_rule(bdd, size);
    debug!("row coverage rule of size {}", bdd.size(coverage));
    bdd.apply_and(exclusion, coverage)
}
