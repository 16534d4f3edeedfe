//! REST API server.

use crate::api::{
    ApiFailure, ApiResponse, GetStateQuery, MakeMoveRequest, MoveData, NewGameData, SessionListData,
    StateData,
};
use crate::config::ServerConfig;
use crate::session::{SessionError, SessionRegistry};
use axum::{
    Json, Router,
    body::Body,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Errors surfaced by REST handlers.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ApiError {
    /// Unknown or missing session (404).
    #[display("{_0}")]
    Session(SessionError),

    /// Request could not be interpreted (400).
    #[display("{message}")]
    BadRequest {
        /// Human-readable reason.
        message: String,
    },
}

impl ApiError {
    /// Builds a 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiFailure::new(self.to_string()))).into_response()
    }
}

/// Builds the REST router over a registry.
#[instrument(skip(registry))]
pub fn router(registry: SessionRegistry) -> Router {
    Router::new()
        .route("/new_game", post(new_game))
        .route("/get_state", get(get_state))
        .route("/make_move", post(make_move))
        .route("/list_sessions", get(list_sessions))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(registry)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Binds the configured address and serves the REST API until shutdown.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig, registry: SessionRegistry) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(addr = %listener.local_addr()?, "Server ready");
    info!("Endpoints: POST /new_game, GET /get_state, POST /make_move, GET /list_sessions");

    axum::serve(listener, router(registry)).await?;
    Ok(())
}

#[instrument(skip(registry))]
async fn new_game(State(registry): State<SessionRegistry>) -> Json<ApiResponse<NewGameData>> {
    let view = registry.create_session();
    info!(session_id = %view.session_id, "New game created");
    Json(ApiResponse::ok(NewGameData::from(view)))
}

#[instrument(skip(registry, query))]
async fn get_state(
    State(registry): State<SessionRegistry>,
    query: Result<Query<GetStateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<StateData>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected get_state query");
        ApiError::bad_request(format!("Malformed query string: {}", rejection.body_text()))
    })?;
    let session_id = query.session_id.unwrap_or_default();
    let view = registry.state(&session_id)?;
    debug!(session_id = %view.session_id, "State served");
    Ok(Json(ApiResponse::ok(StateData::from(view))))
}

#[instrument(skip(registry, body))]
async fn make_move(
    State(registry): State<SessionRegistry>,
    body: Result<Json<MakeMoveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MoveData>>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected make_move body");
        ApiError::bad_request(format!("Malformed request body: {}", rejection.body_text()))
    })?;
    let session_id = req.session_id.clone().unwrap_or_default();

    let Some((row, col)) = req.coordinates() else {
        // Unknown sessions still report 404 first.
        registry.metadata(&session_id)?;
        warn!(session_id = %session_id, row = %req.row, col = %req.col, "Non-integer coordinates");
        return Err(ApiError::bad_request("row and col must be integers"));
    };

    let report = registry.make_move(&session_id, row, col)?;
    Ok(Json(ApiResponse::ok(MoveData::from(report))))
}

#[instrument(skip(registry))]
async fn list_sessions(State(registry): State<SessionRegistry>) -> Json<ApiResponse<SessionListData>> {
    let sessions = registry.list_sessions();
    Json(ApiResponse::ok(SessionListData {
        total_sessions: sessions.len(),
        sessions,
    }))
}
