//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::instrument;

/// Board side length.
pub const SIZE: usize = 3;

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
///
/// On the wire a square is a one-character string: `" "`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Single-character symbol used for rendering and serialization.
    pub fn symbol(self) -> &'static str {
        match self {
            Square::Empty => " ",
            Square::Occupied(Player::X) => "X",
            Square::Occupied(Player::O) => "O",
        }
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        match symbol.as_str() {
            " " | "" => Ok(Square::Empty),
            "X" => Ok(Square::Occupied(Player::X)),
            "O" => Ok(Square::Occupied(Player::O)),
            other => Err(serde::de::Error::custom(format!(
                "unknown square symbol {other:?}"
            ))),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; SIZE * SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Square> {
        if row >= SIZE || col >= SIZE {
            return None;
        }
        self.squares.get(row * SIZE + col).copied()
    }

    /// Places a mark. Callers validate bounds and vacancy first.
    pub(crate) fn place(&mut self, row: usize, col: usize, player: Player) {
        self.squares[row * SIZE + col] = Square::Occupied(player);
    }

    /// Checks if the square at `(row, col)` exists and is empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Square::Empty))
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; SIZE * SIZE] {
        &self.squares
    }

    /// Returns the board as rows.
    pub fn rows(&self) -> [[Square; SIZE]; SIZE] {
        let mut rows = [[Square::Empty; SIZE]; SIZE];
        for (idx, square) in self.squares.iter().enumerate() {
            rows[idx / SIZE][idx % SIZE] = *square;
        }
        rows
    }

    /// Number of squares holding `player`'s mark.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Empty cells as `(row, col)` pairs in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Square::Empty)
            .map(|(idx, _)| (idx / SIZE, idx % SIZE))
            .collect()
    }

    /// Formats the board as a grid with column headers and row separators.
    ///
    /// ```text
    ///   0   1   2
    /// 0 X | O |
    ///   ---|---|---
    /// ...
    /// ```
    #[instrument(skip(self))]
    pub fn render(&self) -> String {
        let mut lines = vec!["  0   1   2".to_string()];
        for (r, row) in self.rows().iter().enumerate() {
            let cells: Vec<&str> = row.iter().map(|s| s.symbol()).collect();
            lines.push(format!("{r} {}", cells.join(" | ")));
            if r < SIZE - 1 {
                lines.push("  ---|---|---".to_string());
            }
        }
        lines.join("\n")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_render() {
        let board = Board::new();
        let expected = "  0   1   2\n0   |   |  \n  ---|---|---\n1   |   |  \n  ---|---|---\n2   |   |  ";
        assert_eq!(board.render(), expected);
    }

    #[test]
    fn test_render_with_marks() {
        let mut board = Board::new();
        board.place(0, 0, Player::X);
        board.place(0, 1, Player::O);
        board.place(1, 1, Player::X);
        board.place(2, 2, Player::O);
        let expected = "  0   1   2\n0 X | O |  \n  ---|---|---\n1   | X |  \n  ---|---|---\n2   |   | O";
        assert_eq!(board.render(), expected);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(3, 0), None);
        assert_eq!(board.get(0, 3), None);
        assert!(!board.is_empty(5, 5));
    }

    #[test]
    fn test_empty_cells_row_major() {
        let mut board = Board::new();
        board.place(0, 1, Player::X);
        board.place(2, 0, Player::O);
        assert_eq!(
            board.empty_cells(),
            vec![(0, 0), (0, 2), (1, 0), (1, 1), (1, 2), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn test_square_wire_symbols() {
        let json = serde_json::to_string(&[
            Square::Empty,
            Square::Occupied(Player::X),
            Square::Occupied(Player::O),
        ])
        .unwrap();
        assert_eq!(json, r#"[" ","X","O"]"#);

        let parsed: Square = serde_json::from_str(r#""O""#).unwrap();
        assert_eq!(parsed, Square::Occupied(Player::O));
        assert!(serde_json::from_str::<Square>(r#""Z""#).is_err());
    }

    #[test]
    fn test_player_display() {
        assert_eq!(Player::X.to_string(), "X");
        assert_eq!(Player::O.opponent(), Player::X);
    }
}
