//! Persistence boundary
//!
//! Entities are joined by identifier (`GroupId`, `UserId`, `SessionId`); records never
//! point at each other. `MemoryRepository` is the in-process implementation.

mod memory;

pub use memory::MemoryRepository;

use crate::core::{ScoreError, Word};
use crate::game::{
    GameSession, Guess, GroupId, NoveltyCount, SessionId, SessionStatus, UserId,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A uniqueness or optimistic-concurrency check failed
    #[error("conflicting write: {0}")]
    Conflict(String),
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One accepted guess as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub word: Word,
    pub novelty: NoveltyCount,
    pub created_at: DateTime<Utc>,
}

/// A stored session with its moves in board order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub group_id: GroupId,
    pub target: Word,
    pub status: SessionStatus,
    pub max_guesses: usize,
    pub created_at: DateTime<Utc>,
    pub moves: Vec<MoveRecord>,
}

impl SessionRecord {
    /// Rebuild the in-memory session by rescoring every stored move
    ///
    /// # Errors
    /// Returns `ScoreError` if a stored word does not fit the target.
    pub fn to_session(&self) -> Result<GameSession, ScoreError> {
        let guesses = self
            .moves
            .iter()
            .map(|m| {
                Ok(Guess {
                    submitter: m.user_id.clone(),
                    scored: crate::core::ScoredGuess::calculate(&m.word, &self.target)?,
                })
            })
            .collect::<Result<Vec<_>, ScoreError>>()?;

        Ok(GameSession::restore(
            self.target.clone(),
            guesses,
            self.status,
            self.max_guesses,
        ))
    }
}

/// Fields needed to open a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub group_id: GroupId,
    pub target: Word,
    pub max_guesses: usize,
    pub created_at: DateTime<Utc>,
}

/// Key-addressed storage for sessions, moves, cooldowns and group flags
///
/// Every method is one atomic unit: it either applies completely or not at all.
pub trait Repository: Send + Sync {
    fn find_active_session(&self, group: &GroupId) -> Result<Option<SessionRecord>, RepositoryError>;

    /// Most recent session of the group, whatever its status
    fn find_latest_session(&self, group: &GroupId) -> Result<Option<SessionRecord>, RepositoryError>;

    fn find_session(&self, id: SessionId) -> Result<Option<SessionRecord>, RepositoryError>;

    fn has_active_session(&self, group: &GroupId) -> Result<bool, RepositoryError>;

    /// Open a session and raise the group's active flag
    ///
    /// Fails with `Conflict` if the group already has an active session.
    fn insert_session(&self, session: NewSession) -> Result<SessionRecord, RepositoryError>;

    /// Append a move, set the session status, update the user's cooldown timestamp
    /// and clear the group's active flag when `status` is terminal.
    ///
    /// Fails with `Conflict` unless the session is still active and holds exactly
    /// `expected_moves` moves.
    fn record_move(
        &self,
        record: MoveRecord,
        status: SessionStatus,
        expected_moves: usize,
    ) -> Result<(), RepositoryError>;

    /// Time of the user's last accepted submission in the group
    fn last_submission(
        &self,
        user: &UserId,
        group: &GroupId,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError>;

    /// Mark every active session `Incomplete` and clear every active flag
    fn reset_active_sessions(&self) -> Result<usize, RepositoryError>;

    fn all_sessions(&self) -> Result<Vec<SessionRecord>, RepositoryError>;

    /// Overwrite per-move novelty counts; `counts` must cover every move in order
    fn update_novelty(
        &self,
        session: SessionId,
        counts: &[NoveltyCount],
    ) -> Result<(), RepositoryError>;

    /// Every move the user made, oldest first
    fn moves_for_user(&self, user: &UserId) -> Result<Vec<MoveRecord>, RepositoryError>;

    /// Non-active sessions of the group, newest first
    fn recent_completed_sessions(
        &self,
        group: &GroupId,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, RepositoryError>;
}
