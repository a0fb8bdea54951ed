//! Mapping between board cells and BDD variables.

use std::fmt;

/// A board coordinate.
///
/// `x` selects the row and `y` the column: the cells `(x, 0..size)` form row `x`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn is_within(self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    /// All cells of a `size`x`size` board in variable order.
    pub fn all(size: usize) -> impl Iterator<Item = Cell> {
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Variable index of `cell` on a board of the given size: `size * y + x`.
///
/// # Panics
///
/// Panics if `cell` is off the board or its index does not fit in `u32`.
/// [`Game`][crate::game::Game] only creates boards whose indices fit.
pub fn variable_index(size: usize, cell: Cell) -> u32 {
    assert!(cell.is_within(size), "Cell {} is outside the {}x{} board", cell, size, size);
    let v = size * cell.y + cell.x;
    assert!(v <= u32::MAX as usize, "Variable index {} does not fit in u32", v);
    v as u32
}

/// Inverse of [`variable_index`].
pub fn cell_of(size: usize, v: u32) -> Cell {
    let v = v as usize;
    Cell::new(v % size, v / size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_index() {
        assert_eq!(variable_index(4, Cell::new(0, 0)), 0);
        assert_eq!(variable_index(4, Cell::new(3, 0)), 3);
        assert_eq!(variable_index(4, Cell::new(0, 1)), 4);
        assert_eq!(variable_index(4, Cell::new(3, 3)), 15);
    }

    #[test]
    fn test_bijection() {
        for size in 1..=6 {
            let vars: Vec<u32> = Cell::all(size).map(|c| variable_index(size, c)).collect();
            let expected: Vec<u32> = (0..(size * size) as u32).collect();
            assert_eq!(vars, expected);
            for cell in Cell::all(size) {
                assert_eq!(cell_of(size, variable_index(size, cell)), cell);
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside the 4x4 board")]
    fn test_variable_index_off_board() {
        variable_index(4, Cell::new(5, 0));
    }

    #[test]
    fn test_is_within() {
        assert!(Cell::new(2, 2).is_within(3));
        assert!(!Cell::new(3, 0).is_within(3));
        assert!(!Cell::new(0, 3).is_within(3));
    }
}
