//! Board geometry.
//!
//! Deck positions are laid out row-major, `grid_size` cards per row. The
//! last row may be partial, and positions past the end of the deck do not
//! exist.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Row and column of a deck position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of deck index `index` on a board `grid_size` wide.
    #[must_use]
    pub fn of_index(index: usize, grid_size: usize) -> Self {
        Self {
            row: index / grid_size,
            col: index % grid_size,
        }
    }

    /// Deck index of this position.
    #[must_use]
    pub fn to_index(self, grid_size: usize) -> usize {
        self.row * grid_size + self.col
    }
}

/// Number of rows needed for `len` cards.
#[must_use]
pub fn row_count(len: usize, grid_size: usize) -> usize {
    len.div_ceil(grid_size)
}

/// Deck indices orthogonally adjacent to `index`, in up, down, left, right
/// order. No wraparound.
#[must_use]
pub fn neighbors(index: usize, len: usize, grid_size: usize) -> SmallVec<[usize; 4]> {
    let mut out = SmallVec::new();
    if index >= len || grid_size == 0 {
        return out;
    }

    let GridPosition { row, col } = GridPosition::of_index(index, grid_size);
    let rows = row_count(len, grid_size);

    if row > 0 {
        out.push(GridPosition::new(row - 1, col).to_index(grid_size));
    }
    if row + 1 < rows {
        let down = GridPosition::new(row + 1, col).to_index(grid_size);
        if down < len {
            out.push(down);
        }
    }
    if col > 0 {
        out.push(GridPosition::new(row, col - 1).to_index(grid_size));
    }
    if col + 1 < grid_size {
        let right = GridPosition::new(row, col + 1).to_index(grid_size);
        if right < len {
            out.push(right);
        }
    }

    out
}
