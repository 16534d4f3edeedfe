//! Pure tic-tac-toe game logic.
//!
//! - **Types**: [`Player`], [`Square`], [`Board`]
//! - **Engine**: [`GameEngine`], the per-game state machine
//! - **Projections**: [`GameSnapshot`] and [`MoveResult`] for transports
//!
//! # Example
//!
//! ```
//! use tiktak_tictactoe::{GameEngine, MoveOutcome, Player};
//!
//! let mut game = GameEngine::new();
//! assert_eq!(game.make_move(1, 1), Ok(MoveOutcome::Continue { next: Player::O }));
//! assert_eq!(game.available_moves().len(), 8);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod rules;
mod snapshot;
mod types;

pub use engine::{GameEngine, MoveError, MoveOutcome};
pub use rules::wins_through;
pub use snapshot::{GameSnapshot, MoveResult};
pub use types::{Board, Player, SIZE, Square};
