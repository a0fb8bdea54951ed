//! The interactive game: a board of cell states kept in sync with the live
//! constraint formula.
//!
//! Each placement restricts the formula with the placed queen's variable set to
//! true. Afterwards every still-empty cell is probed: if fixing its variable to
//! true collapses the formula to false, the cell is marked [`CellState::Blocked`].
//! Once the number of empty cells equals the number of queens still missing,
//! the completion is forced and the game fills it in.

use std::rc::Rc;

use log::{debug, info, warn};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::board::{Board, CellState};
use crate::constraints::queens_formula;
use crate::error::{QueensError, Result};
use crate::index::{cell_of, variable_index, Cell};
use crate::reference::Ref;

/// Outcome of [`Game::place_queen`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Placement {
    /// The queen was placed; the puzzle is still open.
    Placed,
    /// The queen was placed and the forced remainder of the board was filled in.
    Completed,
    /// The cell already held a queen.
    Unchanged,
    /// The cell is blocked; nothing changed.
    Ignored,
}

/// One N-queens game.
///
/// The manager may be shared by games played one after another (see
/// [`Game::with_manager`]); each game owns its own root of the formula.
/// Cloning a game forks it: both copies share the manager.
#[derive(Debug, Clone)]
pub struct Game {
    bdd: Rc<Bdd>,
    size: usize,
    board: Board,
    formula: Ref,
}

impl Game {
    /// Start a game on a `size`x`size` board with a fresh manager.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_manager(Rc::new(Bdd::default()), size)
    }

    /// Start a game reusing an existing manager, keeping its node and computed tables.
    pub fn with_manager(bdd: Rc<Bdd>, size: usize) -> Result<Self> {
        let formula = bdd.one;
        let mut game = Self {
            bdd,
            size: 0,
            board: Board::new(0),
            formula,
        };
        game.initialize(size)?;
        Ok(game)
    }

    /// Reset the game to an empty `size`x`size` board.
    ///
    /// The board needs at least one cell, and every cell needs a 32-bit
    /// variable id. On error the game is left as it was.
    pub fn initialize(&mut self, size: usize) -> Result<()> {
        let num_vars = match size.checked_mul(size) {
            Some(n) if n > 0 && u32::try_from(n).is_ok() => n,
            _ => return Err(QueensError::InvalidBoardSize { size }),
        };
        self.bdd.set_num_vars(num_vars)?;

        self.size = size;
        self.board = Board::new(size);
        self.formula = queens_formula(&self.bdd, size);
        info!(
            "Initialized {}x{} board: formula of size {}, {} nodes in manager",
            size,
            size,
            self.bdd.size(self.formula),
            self.bdd.num_nodes()
        );

        self.update_blocked();
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The live formula.
    pub fn formula(&self) -> Ref {
        self.formula
    }

    pub fn manager(&self) -> &Rc<Bdd> {
        &self.bdd
    }

    pub fn queens_placed(&self) -> usize {
        self.board.count(CellState::Queen)
    }

    pub fn empty_cells(&self) -> usize {
        self.board.count(CellState::Empty)
    }

    /// All `size` queens are on the board and the formula still holds.
    pub fn is_solved(&self) -> bool {
        self.queens_placed() == self.size && !self.bdd.is_zero(self.formula)
    }

    fn variable(&self, cell: Cell) -> u32 {
        variable_index(self.size, cell)
    }

    fn check(&self, cell: Cell) -> Result<()> {
        if cell.is_within(self.size) {
            Ok(())
        } else {
            Err(QueensError::InvalidCoordinate {
                x: cell.x,
                y: cell.y,
                size: self.size,
            })
        }
    }

    /// Whether a queen at `cell` would leave the puzzle without a solution.
    pub fn is_infeasible(&self, cell: Cell) -> Result<bool> {
        self.check(cell)?;
        Ok(self.falsifies(cell))
    }

    fn falsifies(&self, cell: Cell) -> bool {
        let restricted = self.bdd.restrict(self.formula, self.variable(cell), true);
        self.bdd.is_zero(restricted)
    }

    /// Place a queen at `(x, y)`.
    ///
    /// Placing on a cell that already holds a queen, or on a blocked cell, is
    /// accepted without changing anything; the returned [`Placement`] tells
    /// the two apart.
    pub fn place_queen(&mut self, x: usize, y: usize) -> Result<Placement> {
        let cell = Cell::new(x, y);
        self.check(cell)?;

        match self.board[cell] {
            CellState::Queen => {
                debug!("Cell {} already holds a queen", cell);
                return Ok(Placement::Unchanged);
            }
            CellState::Blocked => {
                warn!("Ignoring queen on blocked cell {}", cell);
                return Ok(Placement::Ignored);
            }
            CellState::Empty => {}
        }

        debug!("Placing queen at {}", cell);
        self.board.set(cell, CellState::Queen);
        self.formula = self.bdd.restrict(self.formula, self.variable(cell), true);

        self.update_blocked();

        if self.autocomplete() {
            Ok(Placement::Completed)
        } else {
            Ok(Placement::Placed)
        }
    }

    /// Mark every empty cell whose queen would falsify the formula as blocked.
    fn update_blocked(&mut self) {
        let blocked: Vec<Cell> = self
            .board
            .cells_in(CellState::Empty)
            .filter(|&cell| self.falsifies(cell))
            .collect();
        debug!("Blocking {} cells", blocked.len());
        for cell in blocked {
            self.board.set(cell, CellState::Blocked);
        }
    }

    /// The number of empty cells equals the number of queens still missing.
    pub fn should_autocomplete(&self) -> bool {
        self.empty_cells() == self.size.saturating_sub(self.queens_placed())
    }

    /// Put a queen on every empty cell, if the completion is forced.
    ///
    /// Returns whether the board was completed.
    pub fn autocomplete(&mut self) -> bool {
        if !self.should_autocomplete() {
            return false;
        }

        let empty: Vec<Cell> = self.board.cells_in(CellState::Empty).collect();
        info!("Autocompleting {} remaining queens", empty.len());
        for cell in empty {
            self.board.set(cell, CellState::Queen);
            self.formula = self.bdd.restrict(self.formula, self.variable(cell), true);
        }
        true
    }

    /// Number of complete solutions still reachable from the current board.
    pub fn remaining_solutions(&self) -> BigUint {
        let free = self.size * self.size - self.queens_placed();
        self.bdd.sat_count(self.formula, free)
    }

    /// One complete solution extending the current board, sorted by variable.
    pub fn solution(&self) -> Option<Vec<Cell>> {
        let path = self.bdd.one_sat(self.formula)?;
        // Variables off the path are don't-cares; leave them empty.
        let mut queens: Vec<Cell> = path
            .into_iter()
            .filter(|lit| lit.is_positive())
            .map(|lit| cell_of(self.size, lit.var().index()))
            .chain(self.board.cells_in(CellState::Queen))
            .collect();
        queens.sort_by_key(|&cell| self.variable(cell));
        Some(queens)
    }

    /// An empty cell where a queen keeps the puzzle solvable.
    pub fn hint(&self) -> Option<Cell> {
        self.solution()?
            .into_iter()
            .find(|&cell| self.board[cell] == CellState::Empty)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        let mut cells: Vec<Cell> = list.iter().copied().map(Cell::from).collect();
        cells.sort_by_key(|c| (c.y, c.x));
        cells
    }

    #[test]
    fn test_initialize_rejects_zero() {
        assert_eq!(
            Game::new(0).unwrap_err(),
            QueensError::InvalidBoardSize { size: 0 }
        );

        let mut game = Game::new(4).unwrap();
        assert_eq!(
            game.initialize(0),
            Err(QueensError::InvalidBoardSize { size: 0 })
        );
        assert_eq!(game.size(), 4);
    }

    #[test]
    fn test_single_cell_board() {
        let mut game = Game::new(1).unwrap();
        assert_eq!(game.board()[Cell::new(0, 0)], CellState::Empty);
        assert!(!game.is_solved());

        assert_eq!(game.place_queen(0, 0), Ok(Placement::Completed));
        assert_eq!(game.board()[Cell::new(0, 0)], CellState::Queen);
        assert_eq!(game.board().count(CellState::Blocked), 0);
        assert!(game.is_solved());
    }

    #[test]
    fn test_unsolvable_sizes_block_everything() {
        for size in [2, 3] {
            let mut game = Game::new(size).unwrap();
            assert!(game.manager().is_zero(game.formula()));
            assert_eq!(game.board().count(CellState::Blocked), size * size);
            assert_eq!(game.place_queen(0, 0), Ok(Placement::Ignored));
            assert_eq!(game.queens_placed(), 0);
            assert_eq!(game.hint(), None);
        }
    }

    #[test]
    fn test_four_queens_initial_blocked() {
        let game = Game::new(4).unwrap();
        let open = cells(&[
            (1, 0),
            (3, 1),
            (0, 2),
            (2, 3),
            (2, 0),
            (0, 1),
            (3, 2),
            (1, 3),
        ]);
        for (cell, state) in game.board().iter() {
            let expected = if open.contains(&cell) {
                CellState::Empty
            } else {
                CellState::Blocked
            };
            assert_eq!(state, expected, "cell {}", cell);
        }
        assert_eq!(game.remaining_solutions(), BigUint::from(2u32));
    }

    #[test]
    fn test_four_queens_forced_completion() {
        let mut game = Game::new(4).unwrap();
        assert_eq!(game.place_queen(1, 0), Ok(Placement::Completed));

        let queens: Vec<Cell> = game.board().cells_in(CellState::Queen).collect();
        assert_eq!(queens, cells(&[(1, 0), (3, 1), (0, 2), (2, 3)]));
        assert_eq!(game.empty_cells(), 0);
        assert!(game.is_solved());
        assert!(game.board().is_valid_solution());
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut game = Game::new(5).unwrap();
        assert_eq!(game.place_queen(0, 0), Ok(Placement::Placed));
        let board = game.board().clone();
        let formula = game.formula();

        assert_eq!(game.place_queen(0, 0), Ok(Placement::Unchanged));
        assert_eq!(game.board(), &board);
        assert_eq!(game.formula(), formula);
    }

    #[test]
    fn test_blocked_placement_is_ignored() {
        let mut game = Game::new(5).unwrap();
        game.place_queen(0, 0).unwrap();
        // Same row.
        assert_eq!(game.board()[Cell::new(0, 3)], CellState::Blocked);

        let board = game.board().clone();
        assert_eq!(game.place_queen(0, 3), Ok(Placement::Ignored));
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_out_of_range() {
        let mut game = Game::new(4).unwrap();
        let board = game.board().clone();
        assert_eq!(
            game.place_queen(4, 0),
            Err(QueensError::InvalidCoordinate { x: 4, y: 0, size: 4 })
        );
        assert_eq!(
            game.place_queen(0, 7),
            Err(QueensError::InvalidCoordinate { x: 0, y: 7, size: 4 })
        );
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_blocked_cells_are_sound() {
        let mut game = Game::new(5).unwrap();
        assert_eq!(game.place_queen(0, 0), Ok(Placement::Placed));
        for (cell, state) in game.board().iter() {
            match state {
                CellState::Blocked => assert_eq!(game.is_infeasible(cell), Ok(true), "cell {}", cell),
                CellState::Empty => assert_eq!(game.is_infeasible(cell), Ok(false), "cell {}", cell),
                CellState::Queen => assert_eq!(cell, Cell::new(0, 0)),
            }
        }
        assert_eq!(game.remaining_solutions(), BigUint::from(2u32));
    }

    #[test]
    fn test_hint_and_solution() {
        let mut game = Game::new(5).unwrap();
        game.place_queen(0, 0).unwrap();

        let solution = game.solution().unwrap();
        assert_eq!(solution.len(), 5);
        assert!(solution.contains(&Cell::new(0, 0)));

        let hint = game.hint().unwrap();
        assert_eq!(game.board()[hint], CellState::Empty);
        assert!(solution.contains(&hint));
    }

    #[test]
    fn test_follow_hints_to_completion() {
        let mut game = Game::new(6).unwrap();
        while let Some(hint) = game.hint() {
            let placement = game.place_queen(hint.x, hint.y).unwrap();
            assert!(matches!(placement, Placement::Placed | Placement::Completed));
        }
        assert!(game.is_solved());
        assert!(game.board().is_valid_solution());
        assert_eq!(game.remaining_solutions(), BigUint::from(1u32));
    }

    #[test]
    fn test_reinitialize_with_shared_manager() {
        let bdd = Rc::new(Bdd::default());
        let mut first = Game::with_manager(Rc::clone(&bdd), 5).unwrap();
        let initial = first.formula();
        first.place_queen(0, 0).unwrap();

        let second = Game::with_manager(Rc::clone(&bdd), 5).unwrap();
        assert_eq!(second.formula(), initial);
        assert_eq!(second.empty_cells(), 25);

        first.initialize(4).unwrap();
        assert_eq!(first.size(), 4);
        assert_eq!(first.queens_placed(), 0);
        assert_eq!(bdd.num_vars(), 25);
    }

    #[test]
    fn test_larger_game_survives_smaller_one() {
        let bdd = Rc::new(Bdd::default());
        let mut big = Game::with_manager(Rc::clone(&bdd), 5).unwrap();
        let mut small = Game::with_manager(Rc::clone(&bdd), 4).unwrap();

        // The last cell of the 5x5 board has variable 24.
        assert_eq!(big.is_infeasible(Cell::new(4, 4)), Ok(false));
        assert_eq!(big.place_queen(4, 4), Ok(Placement::Placed));
        assert!(big.hint().is_some());
        assert_eq!(big.remaining_solutions(), BigUint::from(2u32));

        assert_eq!(small.place_queen(1, 0), Ok(Placement::Completed));
        assert!(small.is_solved());

        while let Some(hint) = big.hint() {
            big.place_queen(hint.x, hint.y).unwrap();
        }
        assert!(big.is_solved());
        assert!(big.board().is_valid_solution());
    }

    #[test]
    fn test_infeasible_checks_bounds() {
        let game = Game::new(4).unwrap();
        assert_eq!(
            game.is_infeasible(Cell::new(5, 0)),
            Err(QueensError::InvalidCoordinate { x: 5, y: 0, size: 4 })
        );
        assert_eq!(game.is_infeasible(Cell::new(0, 0)), Ok(true));
        assert_eq!(game.is_infeasible(Cell::new(1, 0)), Ok(false));
    }

    #[test]
    fn test_board_size_limits() {
        // `size * size` overflows.
        assert_eq!(
            Game::new(usize::MAX).unwrap_err(),
            QueensError::InvalidBoardSize { size: usize::MAX }
        );

        let mut game = Game::new(4).unwrap();
        let size = 1 << 16;
        // 2^32 cells do not fit 32-bit variable ids.
        if usize::BITS > 32 {
            assert_eq!(game.initialize(size), Err(QueensError::InvalidBoardSize { size }));
            assert_eq!(game.size(), 4);
        }
    }

    #[test]
    fn test_corners_blocked_before_any_move() {
        // Blocked cells are computed at initialization, not only after the
        // first placement, so an opening move on a 4x4 corner is refused.
        let mut game = Game::new(4).unwrap();
        for (x, y) in [(0, 0), (0, 3), (3, 0), (3, 3)] {
            assert_eq!(game.board()[Cell::new(x, y)], CellState::Blocked);
            assert_eq!(game.place_queen(x, y), Ok(Placement::Ignored));
        }
        assert_eq!(game.queens_placed(), 0);
        assert_eq!(game.empty_cells(), 8);
    }
}
