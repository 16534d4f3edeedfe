//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Win detection only looks at the lines
//! passing through the square that was just played, so it is constant time.

use super::types::{Board, Player, SIZE, Square};
use tracing::instrument;

/// Checks whether `player` owns a complete line through `(row, col)`.
///
/// Considers the row, the column, the main diagonal when `row == col` and
/// the anti-diagonal when `row + col == 2`.
#[instrument(skip(board))]
pub fn wins_through(board: &Board, row: usize, col: usize, player: Player) -> bool {
    let owned = |r: usize, c: usize| board.get(r, c) == Some(Square::Occupied(player));

    (0..SIZE).all(|c| owned(row, c))
        || (0..SIZE).all(|r| owned(r, col))
        || (row == col && (0..SIZE).all(|i| owned(i, i)))
        || (row + col == SIZE - 1 && (0..SIZE).all(|i| owned(i, SIZE - 1 - i)))
}
