//! Implicit session policy for single-agent clients.

use super::backend::{BackendError, GameBackend};
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// The one session every adapter tool call plays in.
///
/// Created lazily by the first tool call that needs it and reused for the
/// life of the adapter process. All callers share the same board, so this
/// is only suitable when a single agent drives the adapter. If creation
/// fails the slot stays empty and the next call tries again.
#[derive(Debug, Default)]
pub struct ImplicitSession {
    id: Mutex<Option<String>>,
}

impl ImplicitSession {
    /// Creates an empty policy; no session exists until first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the implicit session, creating it through `backend` on first use.
    #[instrument(skip_all)]
    pub async fn ensure(&self, backend: &dyn GameBackend) -> Result<String, BackendError> {
        let mut slot = self.id.lock().await;
        if let Some(id) = slot.as_ref() {
            return Ok(id.clone());
        }

        let created = backend.create_session().await?;
        let id = created.session_id.to_string();
        info!(session_id = %id, "Created implicit session");
        *slot = Some(id.clone());
        Ok(id)
    }

    /// The implicit session, if one has been created.
    pub async fn current(&self) -> Option<String> {
        self.id.lock().await.clone()
    }
}
