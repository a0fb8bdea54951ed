use std::fmt;
use std::ops::Index;

use crate::index::Cell;

/// State of a single board cell.
///
/// `Queen` and `Blocked` are terminal: no transition leaves them.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CellState {
    /// No queen yet, and placing one keeps the puzzle solvable.
    #[default]
    Empty,
    /// A queen has been placed here.
    Queen,
    /// Placing a queen here would make the puzzle unsatisfiable.
    Blocked,
}

impl CellState {
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Queen => 'Q',
            CellState::Blocked => 'x',
        }
    }
}

/// The `size`x`size` grid of cell states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<CellState>,
}

impl Board {
    /// An all-`Empty` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn offset(&self, cell: Cell) -> usize {
        assert!(
            cell.is_within(self.size),
            "Cell {} is outside the {}x{} board",
            cell,
            self.size,
            self.size
        );
        cell.y * self.size + cell.x
    }

    pub(crate) fn set(&mut self, cell: Cell, state: CellState) {
        let offset = self.offset(cell);
        self.cells[offset] = state;
    }

    /// All cells in variable order, paired with their states.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        Cell::all(self.size).zip(self.cells.iter().copied())
    }

    /// Cells currently in the given state.
    pub fn cells_in(&self, state: CellState) -> impl Iterator<Item = Cell> + '_ {
        self.iter().filter(move |&(_, s)| s == state).map(|(cell, _)| cell)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Rows (`x`) as slices of states indexed by `y`.
    pub fn rows(&self) -> Vec<Vec<CellState>> {
        (0..self.size)
            .map(|x| (0..self.size).map(|y| self[Cell::new(x, y)]).collect())
            .collect()
    }

    /// Whether the queens form a complete N-queens solution:
    /// one queen per row and per column, none sharing a diagonal.
    pub fn is_valid_solution(&self) -> bool {
        let queens: Vec<Cell> = self.cells_in(CellState::Queen).collect();
        if queens.len() != self.size {
            return false;
        }
        queens.iter().enumerate().all(|(i, a)| {
            queens[i + 1..].iter().all(|b| {
                a.x != b.x && a.y != b.y && a.x.abs_diff(b.x) != a.y.abs_diff(b.y)
            })
        })
    }
}

impl Index<Cell> for Board {
    type Output = CellState;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.cells[self.offset(cell)]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|s| s.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
