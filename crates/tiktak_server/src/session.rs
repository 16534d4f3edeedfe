//! Game session management.
//!
//! The [`SessionRegistry`] maps opaque session identifiers to live games.
//! The map itself sits behind a read-write lock that is only held for the
//! lookup or insert; each game carries its own mutex so moves in different
//! sessions never wait on each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tiktak_tictactoe::{GameEngine, GameSnapshot, MoveResult, Player};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a game session (random UUIDv4).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier issued by the registry.
    ///
    /// Only the canonical lowercase hyphenated form is accepted; other
    /// spellings of the same UUID name no session.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw)
            .ok()
            .filter(|id| id.hyphenated().to_string() == raw)
            .map(Self)
    }
}

/// Session lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// No live session has this identifier.
    #[display("Invalid session_id")]
    NotFound {
        /// Identifier as presented by the caller.
        session_id: String,
    },
}

impl SessionError {
    #[instrument]
    fn not_found(session_id: &str) -> Self {
        warn!(session_id, "Session not found");
        Self::NotFound {
            session_id: session_id.to_string(),
        }
    }
}

/// Timestamps kept for each session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// When the session was created.
    pub created: DateTime<Utc>,
    /// Last successful lookup.
    pub last_accessed: DateTime<Utc>,
}

/// Per-session overview returned by [`SessionRegistry::list_sessions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Whether the game has ended.
    pub game_over: bool,
    /// Player to move.
    pub current_player: Player,
    /// Accepted moves so far.
    pub move_count: u8,
    /// Winner, if any.
    pub winner: Option<Player>,
    /// Session timestamps.
    pub metadata: SessionMetadata,
}

/// A session's identifier together with its game snapshot and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Session ID.
    pub session_id: SessionId,
    /// Game state at the time of the call.
    pub snapshot: GameSnapshot,
    /// Session timestamps.
    pub metadata: SessionMetadata,
}

/// Outcome of a move made through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Session ID.
    pub session_id: SessionId,
    /// Result of the move itself (may report a rejected move).
    pub move_result: MoveResult,
    /// Game state after the move.
    pub snapshot: GameSnapshot,
}

/// Shared handle to a live game.
///
/// Cloning the handle does not copy the game; every clone locks the same
/// engine.
#[derive(Debug, Clone)]
pub struct GameHandle(Arc<Mutex<GameEngine>>);

impl GameHandle {
    /// Locks the game for exclusive access.
    ///
    /// Hold the guard across any read-decide-write sequence.
    pub fn lock(&self) -> MutexGuard<'_, GameEngine> {
        // Engine mutations are all-or-nothing, so a poisoned guard still
        // holds a consistent game.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Session {
    game: GameHandle,
    metadata: Mutex<SessionMetadata>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            game: GameHandle(Arc::new(Mutex::new(GameEngine::new()))),
            metadata: Mutex::new(SessionMetadata {
                created: now,
                last_accessed: now,
            }),
        }
    }

    fn metadata(&self) -> MutexGuard<'_, SessionMetadata> {
        self.metadata.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns every live game session.
///
/// Clones share the same sessions; create separate registries with
/// [`SessionRegistry::new`]. Sessions are never evicted.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    /// Creates a new session with a fresh game.
    #[instrument(skip(self))]
    pub fn create_session(&self) -> SessionView {
        let now = Utc::now();
        let session = Arc::new(Session::new(now));

        let session_id = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let mut id = SessionId::new_random();
            while sessions.contains_key(&id) {
                warn!(session_id = %id, "Session id collision, regenerating");
                id = SessionId::new_random();
            }
            sessions.insert(id, Arc::clone(&session));
            id
        };

        info!(session_id = %session_id, "Created new session");
        let snapshot = session.game.lock().snapshot();
        let metadata = *session.metadata();
        SessionView {
            session_id,
            snapshot,
            metadata,
        }
    }

    /// Looks up a session without touching its metadata.
    fn lookup(&self, session_id: &str) -> Result<(SessionId, Arc<Session>), SessionError> {
        let id = SessionId::parse(session_id).ok_or_else(|| SessionError::not_found(session_id))?;
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&id)
            .map(|session| (id, Arc::clone(session)))
            .ok_or_else(|| SessionError::not_found(session_id))
    }

    /// Looks up a session's game and records the access.
    ///
    /// Returns a handle to the live game, not a copy.
    #[instrument(skip(self))]
    pub fn get_game(&self, session_id: &str) -> Result<GameHandle, SessionError> {
        let (_, session) = self.lookup(session_id)?;
        session.metadata().last_accessed = Utc::now();
        debug!("Session accessed");
        Ok(session.game.clone())
    }

    /// Current metadata of a session. Does not count as an access.
    #[instrument(skip(self))]
    pub fn metadata(&self, session_id: &str) -> Result<SessionMetadata, SessionError> {
        let (_, session) = self.lookup(session_id)?;
        let metadata = *session.metadata();
        Ok(metadata)
    }

    /// Snapshot and metadata of a session, recording the access.
    #[instrument(skip(self))]
    pub fn state(&self, session_id: &str) -> Result<SessionView, SessionError> {
        let (id, session) = self.lookup(session_id)?;
        let metadata = {
            let mut metadata = session.metadata();
            metadata.last_accessed = Utc::now();
            *metadata
        };
        let snapshot = session.game.lock().snapshot();
        Ok(SessionView {
            session_id: id,
            snapshot,
            metadata,
        })
    }

    /// Makes a move in a session's game.
    ///
    /// The game stays locked from validation until the snapshot is taken, so
    /// concurrent moves on one session are applied one after the other.
    #[instrument(skip(self))]
    pub fn make_move(&self, session_id: &str, row: i64, col: i64) -> Result<MoveReport, SessionError> {
        let (id, session) = self.lookup(session_id)?;
        session.metadata().last_accessed = Utc::now();

        let mut game = session.game.lock();
        let outcome = game.make_move(row, col);
        let move_result = MoveResult::new(outcome, &game);
        let snapshot = game.snapshot();
        drop(game);

        info!(
            session_id = %id,
            success = move_result.success,
            game_over = move_result.game_over,
            "Move processed"
        );
        Ok(MoveReport {
            session_id: id,
            move_result,
            snapshot,
        })
    }

    /// Summaries of every live session, keyed by session ID.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> BTreeMap<SessionId, SessionSummary> {
        let sessions: Vec<(SessionId, Arc<Session>)> = {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            sessions.iter().map(|(id, s)| (*id, Arc::clone(s))).collect()
        };

        let summaries: BTreeMap<_, _> = sessions
            .into_iter()
            .map(|(id, session)| {
                let metadata = *session.metadata();
                let game = session.game.lock();
                let summary = SessionSummary {
                    game_over: game.game_over(),
                    current_player: game.current_player(),
                    move_count: game.move_count(),
                    winner: game.winner(),
                    metadata,
                };
                (id, summary)
            })
            .collect();

        info!(count = summaries.len(), "Listed sessions");
        summaries
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no session has been created.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
