//! Tic-tac-toe game engine.
//!
//! A [`GameEngine`] is the state machine for a single board. Its only
//! mutating operation is [`GameEngine::make_move`]; rejected moves leave the
//! engine untouched.

use super::rules;
use super::snapshot::GameSnapshot;
use super::types::{Board, Player, SIZE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Reasons a move is rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum MoveError {
    /// The game already reached a win or a draw.
    #[display("Game is already over!")]
    GameAlreadyOver,

    /// Coordinates are out of bounds or the square is occupied.
    #[display("Invalid move! Cell is occupied or out of bounds")]
    InvalidMove,
}

/// What an accepted move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game continues; `next` is to move.
    Continue {
        /// Player to move next.
        next: Player,
    },
    /// The mover completed a line.
    Won(Player),
    /// Board filled with no line.
    Draw,
}

impl MoveOutcome {
    /// Returns true if this move ended the game.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue { .. })
    }
}

/// Tic-tac-toe game engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    move_count: u8,
    game_over: bool,
    winner: Option<Player>,
}

impl GameEngine {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            move_count: 0,
            game_over: false,
            winner: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is (or who made the final move).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Number of accepted moves.
    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    /// Returns true once the game has been won or drawn.
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Winner, if the game ended in a win.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Empty cells as `(row, col)` pairs in row-major order.
    pub fn available_moves(&self) -> Vec<(usize, usize)> {
        self.board.empty_cells()
    }

    /// Places the current player's mark at `(row, col)`.
    ///
    /// Checks run in order: a finished game rejects everything with
    /// [`MoveError::GameAlreadyOver`]; out-of-range coordinates or an
    /// occupied square give [`MoveError::InvalidMove`].
    #[instrument(skip(self), fields(player = %self.current_player, move_count = self.move_count))]
    pub fn make_move(&mut self, row: i64, col: i64) -> Result<MoveOutcome, MoveError> {
        if self.game_over {
            warn!("Move attempted after game over");
            return Err(MoveError::GameAlreadyOver);
        }

        let Some((r, c)) = cell_index(row).zip(cell_index(col)) else {
            warn!("Move out of bounds");
            return Err(MoveError::InvalidMove);
        };

        if !self.board.is_empty(r, c) {
            warn!("Square is already occupied");
            return Err(MoveError::InvalidMove);
        }

        let player = self.current_player;
        self.board.place(r, c, player);
        self.move_count += 1;

        if rules::wins_through(&self.board, r, c, player) {
            self.game_over = true;
            self.winner = Some(player);
            info!(winner = %player, "Game won");
            return Ok(MoveOutcome::Won(player));
        }

        if usize::from(self.move_count) == SIZE * SIZE {
            self.game_over = true;
            info!("Game drawn");
            return Ok(MoveOutcome::Draw);
        }

        self.current_player = player.opponent();
        debug!(next = %self.current_player, "Move accepted");
        Ok(MoveOutcome::Continue {
            next: self.current_player,
        })
    }

    /// Read-only projection of the current state.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.rows(),
            current_player: self.current_player,
            game_over: self.game_over,
            winner: self.winner,
            move_count: self.move_count,
            available_moves: self.available_moves(),
            board_string: self.board.render(),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_index(value: i64) -> Option<usize> {
    usize::try_from(value).ok().filter(|v| *v < SIZE)
}
