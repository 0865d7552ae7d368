//! Pure game logic: board, win-line rules, and match progression.

mod board;
mod progress;
mod rules;

pub use board::{Board, Cell, Slot};
pub use progress::{EndedReason, MatchState, RoundSummary, RoundVerdict};
pub use rules::{evaluate_winner, win_lines};
