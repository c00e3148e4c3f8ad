//! In-memory repository guarded by a single read/write lock

use super::{MoveRecord, NewSession, Repository, RepositoryError, SessionRecord};
use crate::game::{GroupId, NoveltyCount, SessionId, SessionStatus, UserId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    sessions: BTreeMap<SessionId, SessionRecord>,
    latest_by_group: FxHashMap<GroupId, SessionId>,
    active_by_group: FxHashMap<GroupId, SessionId>,
    last_submission: FxHashMap<(UserId, GroupId), DateTime<Utc>>,
}

/// Repository kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
    #[cfg(test)]
    injected: parking_lot::Mutex<Injected>,
}

/// Failures queued by tests, consumed one per call
#[cfg(test)]
#[derive(Debug, Default)]
struct Injected {
    unavailable_writes: usize,
    conflicting_writes: usize,
    conflicting_inserts: usize,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` move writes fail with `Unavailable`
    #[cfg(test)]
    pub(crate) fn fail_next_writes(&self, count: usize) {
        self.injected.lock().unavailable_writes = count;
    }

    /// Make the next `count` move writes fail with `Conflict`, as if another writer got there first
    #[cfg(test)]
    pub(crate) fn conflict_next_writes(&self, count: usize) {
        self.injected.lock().conflicting_writes = count;
    }

    /// Make the next `count` session inserts fail with `Conflict`
    #[cfg(test)]
    pub(crate) fn conflict_next_inserts(&self, count: usize) {
        self.injected.lock().conflicting_inserts = count;
    }

    #[cfg(test)]
    fn injected_write_failure(&self) -> Result<(), RepositoryError> {
        let mut injected = self.injected.lock();
        if injected.unavailable_writes > 0 {
            injected.unavailable_writes -= 1;
            return Err(RepositoryError::Unavailable("injected failure".to_string()));
        }
        if injected.conflicting_writes > 0 {
            injected.conflicting_writes -= 1;
            return Err(RepositoryError::Conflict("injected conflict".to_string()));
        }
        Ok(())
    }

    #[cfg(test)]
    fn injected_insert_failure(&self) -> Result<(), RepositoryError> {
        let mut injected = self.injected.lock();
        if injected.conflicting_inserts > 0 {
            injected.conflicting_inserts -= 1;
            return Err(RepositoryError::Conflict("injected conflict".to_string()));
        }
        Ok(())
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    const fn injected_write_failure(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    const fn injected_insert_failure(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

impl Repository for MemoryRepository {
    fn find_active_session(&self, group: &GroupId) -> Result<Option<SessionRecord>, RepositoryError> {
        let inner = self.inner.read();
        Ok(inner
            .active_by_group
            .get(group)
            .and_then(|id| inner.sessions.get(id))
            .cloned())
    }

    fn find_latest_session(&self, group: &GroupId) -> Result<Option<SessionRecord>, RepositoryError> {
        let inner = self.inner.read();
        Ok(inner
            .latest_by_group
            .get(group)
            .and_then(|id| inner.sessions.get(id))
            .cloned())
    }

    fn find_session(&self, id: SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(self.inner.read().sessions.get(&id).cloned())
    }

    fn has_active_session(&self, group: &GroupId) -> Result<bool, RepositoryError> {
        Ok(self.inner.read().active_by_group.contains_key(group))
    }

    fn insert_session(&self, session: NewSession) -> Result<SessionRecord, RepositoryError> {
        self.injected_insert_failure()?;

        let mut inner = self.inner.write();
        if let Some(existing) = inner.active_by_group.get(&session.group_id) {
            return Err(RepositoryError::Conflict(format!(
                "group {} already has active session {existing}",
                session.group_id
            )));
        }

        inner.next_id += 1;
        let id = SessionId(inner.next_id);
        let record = SessionRecord {
            id,
            group_id: session.group_id,
            target: session.target,
            status: SessionStatus::Active,
            max_guesses: session.max_guesses,
            created_at: session.created_at,
            moves: Vec::new(),
        };

        inner.latest_by_group.insert(record.group_id.clone(), id);
        inner.active_by_group.insert(record.group_id.clone(), id);
        inner.sessions.insert(id, record.clone());
        Ok(record)
    }

    fn record_move(
        &self,
        record: MoveRecord,
        status: SessionStatus,
        expected_moves: usize,
    ) -> Result<(), RepositoryError> {
        self.injected_write_failure()?;

        let mut inner = self.inner.write();
        let session = inner
            .sessions
            .get_mut(&record.session_id)
            .ok_or(RepositoryError::NotFound(record.session_id))?;

        if session.status != SessionStatus::Active {
            return Err(RepositoryError::Conflict(format!(
                "session {} is {:?}",
                session.id, session.status
            )));
        }
        if session.moves.len() != expected_moves {
            return Err(RepositoryError::Conflict(format!(
                "session {} has {} moves, expected {expected_moves}",
                session.id,
                session.moves.len()
            )));
        }

        let group = session.group_id.clone();
        let key = (record.user_id.clone(), group.clone());
        let submitted_at = record.created_at;

        session.status = status;
        session.moves.push(record);

        inner.last_submission.insert(key, submitted_at);
        if status.is_terminal() {
            inner.active_by_group.remove(&group);
        }
        Ok(())
    }

    fn last_submission(
        &self,
        user: &UserId,
        group: &GroupId,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .last_submission
            .get(&(user.clone(), group.clone()))
            .copied())
    }

    fn reset_active_sessions(&self) -> Result<usize, RepositoryError> {
        let mut inner = self.inner.write();
        let active: Vec<SessionId> = inner.active_by_group.drain().map(|(_, id)| id).collect();

        for id in &active {
            if let Some(session) = inner.sessions.get_mut(id) {
                session.status = SessionStatus::Incomplete;
            }
        }
        Ok(active.len())
    }

    fn all_sessions(&self) -> Result<Vec<SessionRecord>, RepositoryError> {
        Ok(self.inner.read().sessions.values().cloned().collect())
    }

    fn update_novelty(
        &self,
        session: SessionId,
        counts: &[NoveltyCount],
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write();
        let record = inner
            .sessions
            .get_mut(&session)
            .ok_or(RepositoryError::NotFound(session))?;

        if record.moves.len() != counts.len() {
            return Err(RepositoryError::Conflict(format!(
                "session {session} has {} moves, got {} counts",
                record.moves.len(),
                counts.len()
            )));
        }

        for (stored, &count) in record.moves.iter_mut().zip(counts) {
            stored.novelty = count;
        }
        Ok(())
    }

    fn moves_for_user(&self, user: &UserId) -> Result<Vec<MoveRecord>, RepositoryError> {
        let inner = self.inner.read();
        let mut moves: Vec<MoveRecord> = inner
            .sessions
            .values()
            .flat_map(|s| s.moves.iter())
            .filter(|m| &m.user_id == user)
            .cloned()
            .collect();
        moves.sort_by_key(|m| (m.created_at, m.session_id));
        Ok(moves)
    }

    fn recent_completed_sessions(
        &self,
        group: &GroupId,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, RepositoryError> {
        let inner = self.inner.read();
        let mut sessions: Vec<&SessionRecord> = inner
            .sessions
            .values()
            .filter(|s| &s.group_id == group && s.status.is_terminal())
            .collect();
        sessions.sort_by_key(|s| std::cmp::Reverse((s.created_at, s.id)));
        Ok(sessions.into_iter().take(limit).cloned().collect())
    }
}
