//! Tests for win-line generation and winner evaluation.

use gridmatch::{Board, GameConfig, MatchFormat, Slot, evaluate_winner, win_lines};
use std::collections::HashSet;

fn config(grid_size: usize, win_length: usize) -> GameConfig {
    GameConfig {
        grid_size,
        win_length,
        format: MatchFormat::Single,
    }
}

fn expected_count(n: usize, k: usize) -> usize {
    let s = n - k + 1;
    2 * n * s + 2 * s * s
}

#[test]
fn test_line_count_matches_formula() {
    for (n, k) in [(1, 1), (3, 3), (4, 3), (4, 4), (5, 4), (7, 5)] {
        let lines = win_lines(n, k);
        assert_eq!(
            lines.len(),
            expected_count(n, k),
            "line count for {}x{} win-{}",
            n,
            n,
            k
        );
    }
}

#[test]
fn test_lines_have_exact_win_length() {
    for (n, k) in [(3, 3), (5, 3), (6, 4)] {
        for line in win_lines(n, k) {
            assert_eq!(line.len(), k, "every line is exactly win_length long");
        }
    }
}

#[test]
fn test_no_duplicate_lines() {
    for (n, k) in [(3, 3), (4, 3), (5, 4)] {
        let lines = win_lines(n, k);
        let unique: HashSet<_> = lines.iter().cloned().collect();
        assert_eq!(unique.len(), lines.len(), "no duplicates for {}x{} win-{}", n, n, k);
    }
}

#[test]
fn test_generation_order_is_stable() {
    assert_eq!(win_lines(4, 3), win_lines(4, 3));
    // Rows come first, scanned row-major.
    let lines = win_lines(3, 3);
    assert_eq!(lines[0], vec![0, 1, 2]);
}

#[test]
fn test_all_indexes_in_range() {
    let n = 6;
    let k = 4;
    for line in win_lines(n, k) {
        for &i in &line {
            assert!(i < n * n, "index {} out of range", i);
        }
    }
}

#[test]
fn test_empty_board_has_no_winner() {
    let board = Board::new(3);
    assert_eq!(evaluate_winner(&board, &config(3, 3)), None);
}

#[test]
fn test_partial_line_is_not_a_win() {
    let mut board = Board::new(3);
    board.place(0, Slot::A);
    board.place(1, Slot::A);
    assert_eq!(evaluate_winner(&board, &config(3, 3)), None);
}

#[test]
fn test_mixed_line_is_not_a_win() {
    let mut board = Board::new(3);
    board.place(0, Slot::A);
    board.place(1, Slot::B);
    board.place(2, Slot::A);
    assert_eq!(evaluate_winner(&board, &config(3, 3)), None);
}

#[test]
fn test_top_row_win_for_slot_a() {
    let mut board = Board::new(3);
    board.place(0, Slot::A);
    board.place(1, Slot::A);
    board.place(2, Slot::A);
    let (winner, line) = evaluate_winner(&board, &config(3, 3)).expect("should have a winner");
    assert_eq!(winner, Slot::A);
    assert_eq!(line, vec![0, 1, 2]);
}

#[test]
fn test_diagonal_win_on_4x4() {
    let mut board = Board::new(4);
    for i in [0, 5, 10, 15] {
        board.place(i, Slot::B);
    }
    let (winner, line) = evaluate_winner(&board, &config(4, 4)).expect("should have a winner");
    assert_eq!(winner, Slot::B);
    assert_eq!(line, vec![0, 5, 10, 15]);
}

#[test]
fn test_anti_diagonal_win() {
    let mut board = Board::new(3);
    for i in [2, 4, 6] {
        board.place(i, Slot::B);
    }
    let (winner, line) = evaluate_winner(&board, &config(3, 3)).expect("should have a winner");
    assert_eq!(winner, Slot::B);
    assert_eq!(line, vec![2, 4, 6]);
}

#[test]
fn test_short_win_length_on_large_grid() {
    // 5x5 win-3: a column segment in the middle of the board.
    let mut board = Board::new(5);
    for i in [7, 12, 17] {
        board.place(i, Slot::A);
    }
    let (winner, line) = evaluate_winner(&board, &config(5, 3)).expect("should have a winner");
    assert_eq!(winner, Slot::A);
    assert_eq!(line, vec![7, 12, 17]);
}

#[test]
fn test_first_found_line_wins_tie_break() {
    // Two simultaneous lines for the same slot: the row line precedes the
    // column line in generation order.
    let mut board = Board::new(3);
    for i in [0, 1, 2, 3, 6] {
        board.place(i, Slot::A);
    }
    let (_, line) = evaluate_winner(&board, &config(3, 3)).expect("should have a winner");
    assert_eq!(line, vec![0, 1, 2], "rows are generated before columns");
}
