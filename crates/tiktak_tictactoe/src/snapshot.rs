//! Serializable projections of a game: state snapshots and move results.

use super::engine::{GameEngine, MoveError, MoveOutcome};
use super::types::{Player, SIZE, Square};
use serde::{Deserialize, Serialize};

/// Read-only view of a [`GameEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board rows, top to bottom.
    pub board: [[Square; SIZE]; SIZE],
    /// Player to move (or who made the final move).
    pub current_player: Player,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Winner, if any.
    pub winner: Option<Player>,
    /// Number of accepted moves.
    pub move_count: u8,
    /// Empty cells as `[row, col]` pairs in row-major order.
    pub available_moves: Vec<(usize, usize)>,
    /// Human-readable grid.
    pub board_string: String,
}

/// Result of one `make_move` call, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Whether the move was accepted.
    pub success: bool,
    /// Human-readable description.
    pub message: String,
    /// Whether the game is over after this call.
    pub game_over: bool,
    /// Winner, if the game is won.
    pub winner: Option<Player>,
    /// Rejection reason for failed moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<MoveError>,
}

impl MoveResult {
    /// Builds the result of a move from its outcome and the engine it ran on.
    pub fn new(outcome: Result<MoveOutcome, MoveError>, engine: &GameEngine) -> Self {
        match outcome {
            Ok(outcome) => {
                let message = match outcome {
                    MoveOutcome::Won(player) => format!("Player {player} wins!"),
                    MoveOutcome::Draw => "Draw!".to_string(),
                    MoveOutcome::Continue { next } => format!("Move successful! Next player: {next}"),
                };
                Self {
                    success: true,
                    message,
                    game_over: outcome.is_terminal(),
                    winner: engine.winner(),
                    error: None,
                }
            }
            Err(error) => Self {
                success: false,
                message: error.to_string(),
                game_over: engine.game_over(),
                winner: engine.winner(),
                error: Some(error),
            },
        }
    }
}
