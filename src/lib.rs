//! # queens-bdd: interactive N-queens on Binary Decision Diagrams
//!
//! **`queens-bdd`** keeps the rules of the N-queens puzzle as a single
//! **Binary Decision Diagram (BDD)** and narrows it as the player places queens.
//! After every move it knows exactly which squares are still worth trying.
//!
//! ## How it works
//!
//! Every cell `(x, y)` of the `N`x`N` board gets one boolean variable
//! `N * y + x`, true iff a queen sits there. The rules become one formula:
//!
//! - a queen on a cell forbids queens on its row, column and both diagonals;
//! - every row holds at least one queen.
//!
//! Since BDDs are **canonical**, the formula is unsatisfiable exactly when it is
//! the constant `false` node, which makes the feasibility check for a square a
//! single restriction followed by a pointer comparison.
//!
//! ## Basic Usage
//!
//! ```rust
//! use queens_bdd::board::CellState;
//! use queens_bdd::game::{Game, Placement};
//! use queens_bdd::index::Cell;
//!
//! let mut game = Game::new(4).unwrap();
//!
//! // Corners never appear in a 4-queens solution.
//! assert_eq!(game.board()[Cell::new(0, 0)], CellState::Blocked);
//!
//! // A single queen forces the rest of the board.
//! assert_eq!(game.place_queen(1, 0), Ok(Placement::Completed));
//! assert!(game.is_solved());
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: the [`Bdd`][crate::bdd::Bdd] manager (hash-consing, ITE, restriction).
//! - **[`sat`]**: model counting and witness extraction.
//! - **[`constraints`]**: the N-queens encoding.
//! - **[`game`]**: the [`Game`][crate::game::Game] controller callers interact with.

pub mod bdd;
pub mod board;
pub mod cache;
pub mod constraints;
pub mod error;
pub mod game;
pub mod index;
pub mod node;
pub mod reference;
pub mod sat;
pub mod table;
pub mod types;
pub mod utils;
