//! Core board types for an N x N grid.

use serde::{Deserialize, Serialize};

/// One of the two fixed participant roles in a session, independent of
/// which user currently occupies it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Slot {
    /// First seat (session creator, moves first).
    A,
    /// Second seat (joiner).
    B,
}

impl Slot {
    /// Returns the other slot.
    pub fn opponent(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unclaimed cell.
    Empty,
    /// Cell claimed by a slot.
    Taken(Slot),
}

/// Row-major N x N board. Invariant: always holds exactly `grid_size^2`
/// cells for the session's configured grid size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board for the given side length.
    pub fn new(grid_size: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; grid_size * grid_size],
        }
    }

    /// Gets the cell at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks whether the cell at `index` is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks whether every cell is taken.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Claims the cell at `index` for `slot`.
    ///
    /// Performs no validation; the state machine guarantees the index is in
    /// range and the cell was empty before calling this.
    pub fn place(&mut self, index: usize, slot: Slot) {
        self.cells[index] = Cell::Taken(slot);
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
