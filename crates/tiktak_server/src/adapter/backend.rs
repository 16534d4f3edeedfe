//! Backends the adapter forwards game operations to.

use crate::api::{ApiResponse, MoveData, NewGameData, StateData};
use crate::session::SessionRegistry;
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

/// Failure to reach or understand the game server.
#[derive(Debug, Clone, Display, Error)]
#[display("Backend error: {} at {}:{}", message, file, line)]
pub struct BackendError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BackendError {
    /// Creates a new backend error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The three game operations the adapter needs.
#[async_trait]
pub trait GameBackend: Send + Sync {
    /// Creates a new session.
    async fn create_session(&self) -> Result<NewGameData, BackendError>;

    /// Reads a session's state.
    async fn get_state(&self, session_id: &str) -> Result<StateData, BackendError>;

    /// Plays a move in a session.
    async fn make_move(&self, session_id: &str, row: i64, col: i64) -> Result<MoveData, BackendError>;
}

/// Calls an in-process registry directly.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    registry: SessionRegistry,
}

impl LocalBackend {
    /// Wraps a registry.
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl GameBackend for LocalBackend {
    async fn create_session(&self) -> Result<NewGameData, BackendError> {
        Ok(self.registry.create_session().into())
    }

    async fn get_state(&self, session_id: &str) -> Result<StateData, BackendError> {
        self.registry
            .state(session_id)
            .map(StateData::from)
            .map_err(|e| BackendError::new(e.to_string()))
    }

    async fn make_move(&self, session_id: &str, row: i64, col: i64) -> Result<MoveData, BackendError> {
        self.registry
            .make_move(session_id, row, col)
            .map(MoveData::from)
            .map_err(|e| BackendError::new(e.to_string()))
    }
}

/// Talks to a running REST server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `GET /get_state` for `session_id`, query-encoded.
    fn state_url(&self, session_id: &str) -> Result<reqwest::Url, BackendError> {
        let mut url = reqwest::Url::parse(&format!("{}/get_state", self.base_url))
            .map_err(|e| BackendError::new(format!("Invalid base URL {}: {e}", self.base_url)))?;
        url.query_pairs_mut().append_pair("session_id", session_id);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Game server returned an error");
            return Err(BackendError::new(format!("Game server returned {status}")));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to decode game server response");
            BackendError::new(format!("Failed to decode response: {e}"))
        })?;
        Ok(envelope.data)
    }
}

fn request_failed(e: reqwest::Error) -> BackendError {
    error!(error = ?e, "Game server request failed");
    BackendError::new(format!("Request failed: {e}"))
}

#[async_trait]
impl GameBackend for HttpBackend {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn create_session(&self) -> Result<NewGameData, BackendError> {
        debug!("Creating session over HTTP");
        let response = self
            .client
            .post(format!("{}/new_game", self.base_url))
            .send()
            .await
            .map_err(request_failed)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_state(&self, session_id: &str) -> Result<StateData, BackendError> {
        debug!("Fetching state over HTTP");
        let response = self
            .client
            .get(self.state_url(session_id)?)
            .send()
            .await
            .map_err(request_failed)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn make_move(&self, session_id: &str, row: i64, col: i64) -> Result<MoveData, BackendError> {
        debug!("Posting move over HTTP");
        let payload = serde_json::json!({
            "session_id": session_id,
            "row": row,
            "col": col,
        });
        let response = self
            .client
            .post(format!("{}/make_move", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(request_failed)?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_url_encodes_session_id() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/");
        let url = backend.state_url("a b&session_id=x#frag").unwrap();

        assert_eq!(url.path(), "/get_state");
        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("session_id".to_string(), "a b&session_id=x#frag".to_string())]
        );
    }

    #[test]
    fn test_state_url_rejects_bad_base() {
        let backend = HttpBackend::new("not a url");
        assert!(backend.state_url("abc").is_err());
    }
}
