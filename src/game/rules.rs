//! Win-line generation and winner evaluation for arbitrary grids.

use crate::config::GameConfig;
use crate::game::board::{Board, Cell, Slot};

/// Generates every maximal-length contiguous index sequence of exactly
/// `win_length` cells along rows, columns, and both diagonal directions of a
/// `grid_size` x `grid_size` board.
///
/// Output order is stable: rows first, then columns, then down-right
/// diagonals, then down-left diagonals, each block scanned row-major. For an
/// n x n board with win length k the count is
/// `2*n*(n-k+1) + 2*(n-k+1)^2`; there are no duplicate lines.
pub fn win_lines(grid_size: usize, win_length: usize) -> Vec<Vec<usize>> {
    let n = grid_size;
    let k = win_length;
    debug_assert!(k >= 1 && k <= n, "config validated before line generation");

    let span = n - k; // largest starting offset along a win direction
    let mut lines = Vec::with_capacity(2 * n * (span + 1) + 2 * (span + 1) * (span + 1));

    // Rows
    for row in 0..n {
        for col in 0..=span {
            lines.push((0..k).map(|i| row * n + col + i).collect());
        }
    }
    // Columns
    for row in 0..=span {
        for col in 0..n {
            lines.push((0..k).map(|i| (row + i) * n + col).collect());
        }
    }
    // Down-right diagonals
    for row in 0..=span {
        for col in 0..=span {
            lines.push((0..k).map(|i| (row + i) * n + col + i).collect());
        }
    }
    // Down-left diagonals
    for row in 0..=span {
        for col in (k - 1)..n {
            lines.push((0..k).map(|i| (row + i) * n + col - i).collect());
        }
    }

    lines
}

/// Scans each win line once and returns the first line fully held by one
/// slot, together with that slot.
///
/// Multiple simultaneous winning lines are not disambiguated beyond "first
/// found" in generation order; that tie-break is deterministic.
pub fn evaluate_winner(board: &Board, config: &GameConfig) -> Option<(Slot, Vec<usize>)> {
    for line in win_lines(config.grid_size, config.win_length) {
        let first = match board.get(line[0]) {
            Some(Cell::Taken(slot)) => slot,
            _ => continue,
        };
        if line[1..]
            .iter()
            .all(|&i| board.get(i) == Some(Cell::Taken(first)))
        {
            return Some((first, line));
        }
    }
    None
}
