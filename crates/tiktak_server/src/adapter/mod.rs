//! Agent-facing MCP adapter.
//!
//! Exposes `make_move`, `get_board` and `example_moves` tools that forward to
//! the game through a [`GameBackend`]: either a running REST server
//! ([`HttpBackend`]) or an in-process registry ([`LocalBackend`]).

mod backend;
mod implicit;
mod tools;

pub use backend::{BackendError, GameBackend, HttpBackend, LocalBackend};
pub use implicit::ImplicitSession;
pub use tools::{EXAMPLE_MOVES, GameTools, MOVE_FAILED, MakeMoveParams, STATE_FAILED, serve_stdio};
