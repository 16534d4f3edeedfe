//! Request and response records for the REST API.
//!
//! Every response is wrapped in an envelope: `{"success": true, "data": ...}`
//! on success, `{"success": false, "message": ...}` on failure.

use crate::session::{MoveReport, SessionId, SessionMetadata, SessionSummary, SessionView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tiktak_tictactoe::{GameSnapshot, MoveResult};

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always true.
    pub success: bool,
    /// Operation payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failed response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Always false.
    pub success: bool,
    /// Human-readable reason.
    pub message: String,
}

impl ApiFailure {
    /// Builds a failure envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Payload of `POST /new_game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameData {
    /// Identifier of the new session.
    pub session_id: SessionId,
    /// Confirmation text.
    pub message: String,
    /// Initial game state.
    pub game_state: GameSnapshot,
    /// Session timestamps.
    pub metadata: SessionMetadata,
}

impl From<SessionView> for NewGameData {
    fn from(view: SessionView) -> Self {
        Self {
            session_id: view.session_id,
            message: "New game created successfully".to_string(),
            game_state: view.snapshot,
            metadata: view.metadata,
        }
    }
}

/// Payload of `GET /get_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateData {
    /// Session ID.
    pub session_id: SessionId,
    /// Current game state.
    pub game_state: GameSnapshot,
    /// Session timestamps.
    pub metadata: SessionMetadata,
}

impl From<SessionView> for StateData {
    fn from(view: SessionView) -> Self {
        Self {
            session_id: view.session_id,
            game_state: view.snapshot,
            metadata: view.metadata,
        }
    }
}

/// Payload of `POST /make_move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    /// Session ID.
    pub session_id: SessionId,
    /// What the move did.
    pub move_result: MoveResult,
    /// Game state after the move.
    pub game_state: GameSnapshot,
}

impl From<MoveReport> for MoveData {
    fn from(report: MoveReport) -> Self {
        Self {
            session_id: report.session_id,
            move_result: report.move_result,
            game_state: report.snapshot,
        }
    }
}

/// Payload of `GET /list_sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListData {
    /// Number of live sessions.
    pub total_sessions: usize,
    /// Summary per session, keyed by session ID.
    pub sessions: BTreeMap<SessionId, SessionSummary>,
}

/// Query string of `GET /get_state`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetStateQuery {
    /// Session to read.
    pub session_id: Option<String>,
}

/// Body of `POST /make_move`.
///
/// Coordinates are kept as raw JSON so the handler can tell a missing session
/// apart from malformed coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MakeMoveRequest {
    /// Session to play in.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Row, expected to be an integer.
    #[serde(default)]
    pub row: serde_json::Value,
    /// Column, expected to be an integer.
    #[serde(default)]
    pub col: serde_json::Value,
}

impl MakeMoveRequest {
    /// Integer coordinates, or `None` if either is missing or not an integer.
    ///
    /// Integers too large for `i64` saturate to `i64::MAX` so the engine
    /// rejects them as out of bounds.
    pub fn coordinates(&self) -> Option<(i64, i64)> {
        integer(&self.row).zip(integer(&self.col))
    }
}

fn integer(value: &serde_json::Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.is_u64().then_some(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(row: serde_json::Value, col: serde_json::Value) -> MakeMoveRequest {
        MakeMoveRequest {
            session_id: None,
            row,
            col,
        }
    }

    #[test]
    fn test_coordinates() {
        assert_eq!(request(json!(1), json!(-2)).coordinates(), Some((1, -2)));
        assert_eq!(
            request(json!(u64::MAX), json!(0)).coordinates(),
            Some((i64::MAX, 0))
        );
        assert_eq!(request(json!("1"), json!(0)).coordinates(), None);
        assert_eq!(request(json!(1.5), json!(0)).coordinates(), None);
        assert_eq!(request(serde_json::Value::Null, json!(0)).coordinates(), None);
    }
}
