//! MCP tool server exposing the game to tool-calling agents.

use super::backend::GameBackend;
use super::implicit::ImplicitSession;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tiktak_tictactoe::GameSnapshot;
use tracing::{info, instrument, warn};

/// Reply when a move could not be forwarded.
pub const MOVE_FAILED: &str = "Error executing move.";

/// Reply when the board could not be fetched.
pub const STATE_FAILED: &str = "Error fetching game state.";

/// Static help text returned by `example_moves`.
pub const EXAMPLE_MOVES: &str = "Example moves:\n\
make_move(row=0, col=0)  # X takes the top-left corner\n\
make_move(row=1, col=1)  # O takes the center\n\
make_move(row=2, col=2)  # X takes the bottom-right corner\n\
Rows and columns are numbered 0-2. X always moves first and turns alternate automatically.";

/// Request for making a move.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MakeMoveParams {
    /// Row (0-2, top to bottom).
    pub row: i64,
    /// Column (0-2, left to right).
    pub col: i64,
}

/// MCP handler with `make_move`, `get_board` and `example_moves` tools.
///
/// Every call plays in the adapter's [`ImplicitSession`].
pub struct GameTools {
    backend: Arc<dyn GameBackend>,
    session: ImplicitSession,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GameTools {
    /// Creates the tool server over a backend.
    pub fn new(backend: Arc<dyn GameBackend>) -> Self {
        info!("Creating game tool server");
        Self {
            backend,
            session: ImplicitSession::new(),
            tool_router: Self::tool_router(),
        }
    }

    /// The implicit session policy in use.
    pub fn session(&self) -> &ImplicitSession {
        &self.session
    }

    /// Plays a move in the implicit session and describes the result.
    #[instrument(skip(self))]
    pub async fn play(&self, row: i64, col: i64) -> String {
        let session_id = match self.session.ensure(self.backend.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "No implicit session");
                return MOVE_FAILED.to_string();
            }
        };

        match self.backend.make_move(&session_id, row, col).await {
            Ok(data) => {
                let verb = if data.move_result.success { "Move executed" } else { "Move rejected" };
                format!(
                    "{}: {}\n\n{}",
                    verb, data.move_result.message, data.game_state.board_string
                )
            }
            Err(e) => {
                warn!(error = %e, session_id = %session_id, "Move forwarding failed");
                MOVE_FAILED.to_string()
            }
        }
    }

    /// Describes the implicit session's board.
    #[instrument(skip(self))]
    pub async fn board(&self) -> String {
        let session_id = match self.session.ensure(self.backend.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "No implicit session");
                return STATE_FAILED.to_string();
            }
        };

        match self.backend.get_state(&session_id).await {
            Ok(data) => format!("Current game state:\n{}", describe(&data.game_state)),
            Err(e) => {
                warn!(error = %e, session_id = %session_id, "State fetch failed");
                STATE_FAILED.to_string()
            }
        }
    }

    /// Makes a move in the implicit game.
    #[tool(description = "Make a tic-tac-toe move at (row, col), both 0-2. The game session is managed automatically.")]
    pub async fn make_move(
        &self,
        Parameters(req): Parameters<MakeMoveParams>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.play(req.row, req.col).await;
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    /// Shows the current board.
    #[tool(description = "Show the current tic-tac-toe board and game status")]
    pub async fn get_board(&self) -> Result<CallToolResult, McpError> {
        let message = self.board().await;
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    /// Shows example moves.
    #[tool(description = "Show example tic-tac-toe moves")]
    pub async fn example_moves(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(EXAMPLE_MOVES)]))
    }
}

fn describe(snapshot: &GameSnapshot) -> String {
    let status = match (snapshot.game_over, snapshot.winner) {
        (true, Some(winner)) => format!("Player {winner} won"),
        (true, None) => "Draw".to_string(),
        (false, _) => format!("Player {} to move", snapshot.current_player),
    };
    format!(
        "{}\n\nStatus: {}\nMoves played: {}",
        snapshot.board_string, status, snapshot.move_count
    )
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for GameTools {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.instructions = Some(
            "Tic-tac-toe: call make_move with row and col (0-2); get_board shows the game".into(),
        );
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info
    }
}

/// Serves the tools over stdin/stdout until the client disconnects.
#[instrument(skip_all)]
pub async fn serve_stdio(tools: GameTools) -> anyhow::Result<()> {
    info!("MCP adapter ready on stdio");
    let service = tools.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiktak_tictactoe::GameEngine;

    #[test]
    fn test_describe_statuses() {
        let mut engine = GameEngine::new();
        assert!(describe(&engine.snapshot()).contains("Player X to move"));

        for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            engine.make_move(r, c).unwrap();
        }
        let text = describe(&engine.snapshot());
        assert!(text.contains("Player X won"));
        assert!(text.contains("Moves played: 5"));
    }
}
