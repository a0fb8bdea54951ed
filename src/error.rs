use thiserror::Error;

/// Errors reported at the boundary of the engine.
///
/// Violations of internal invariants (such as referencing a variable outside
/// the manager's universe) are bugs and panic instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueensError {
    /// The board must have at least one cell.
    #[error("Board size must be positive, got {size}")]
    InvalidBoardSize { size: usize },

    /// The manager needs a non-empty variable universe.
    #[error("Variable count must be positive, got {count}")]
    InvalidVariableCount { count: usize },

    /// A coordinate lies outside the board.
    #[error("Cell ({x}, {y}) is outside the {size}x{size} board")]
    InvalidCoordinate { x: usize, y: usize, size: usize },
}

pub type Result<T, E = QueensError> = std::result::Result<T, E>;
