//! Facade coordinating sessions across many groups
//!
//! Every read-validate-append sequence runs under a lock scoped to the group, so
//! two players racing in one group are serialized while different groups never
//! wait on each other. The repository is the source of truth: each submission
//! rebuilds the session from storage, mutates a private copy, and discards that
//! copy if the write fails.

use super::clock::Clock;
use super::ids::{GroupId, SessionId, UserId};
use super::keyboard::Keyboard;
use super::novelty::{self, NoveltyCount};
use super::policy::{Rejection, SubmissionPolicy};
use super::session::{DEFAULT_MAX_GUESSES, GameSession, SessionError, SessionStatus};
use super::stats::{DEFAULT_PAR, UserStats};
use crate::core::{ScoreError, ScoredGuess, Word, WordError};
use crate::storage::{MoveRecord, NewSession, Repository, RepositoryError, SessionRecord};
use crate::words::{Dictionary, WordSource};
use dashmap::DashMap;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Attempts at creating a session before giving up on a contended group
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Attempts at a submission whose write lost a race
const MAX_SUBMIT_ATTEMPTS: usize = 3;

/// Infrastructure or consistency failures. Rejected submissions are not errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("stored session {session} cannot be replayed: {source}")]
    CorruptSession {
        session: SessionId,
        #[source]
        source: ScoreError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("could not open a session for group {group} after {attempts} attempts")]
    CreationContention { group: GroupId, attempts: usize },
    #[error("submission in group {group} kept conflicting after {attempts} attempts")]
    SubmissionContention { group: GroupId, attempts: usize },
}

/// Details of an accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub session_id: SessionId,
    pub scored: ScoredGuess,
    pub novelty: NoveltyCount,
    pub guesses_used: usize,
    pub max_guesses: usize,
    /// Revealed only when this guess ended the session
    pub answer: Option<Word>,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted(Receipt),
    Won(Receipt),
    Lost(Receipt),
    Rejected(Rejection),
}

/// Result of an administrative restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    Unauthorized,
    SessionsReset(usize),
    StatisticsRebuilt(RebuildReport),
}

/// Summary of a statistics rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub sessions: usize,
    pub moves: usize,
    /// Moves whose stored counts differed from the replay
    pub corrected: usize,
}

/// A finished session as shown in the recent-games list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGame {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub guesses_used: usize,
    pub final_guess: Option<Word>,
    pub answer: Word,
}

/// Target of a finished session with its definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedAnswer {
    pub word: Word,
    pub definition: Option<String>,
}

/// Where a word stands with respect to the vocabularies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLookup {
    pub word: Word,
    pub possible_target: bool,
    pub submittable: bool,
}

/// Tunables for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_guesses: usize,
    pub policy: SubmissionPolicy,
    pub par: i64,
    /// Open a session on demand when a submission finds none
    pub auto_start: bool,
    pub recent_games_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_guesses: DEFAULT_MAX_GUESSES,
            policy: SubmissionPolicy::default(),
            par: DEFAULT_PAR,
            auto_start: true,
            recent_games_limit: 5,
        }
    }
}

/// Coordinates submissions, queries and maintenance across groups
pub struct SessionOrchestrator<R: Repository> {
    repository: R,
    words: Box<dyn WordSource>,
    dictionary: Box<dyn Dictionary>,
    clock: Arc<dyn Clock>,
    settings: Settings,
    group_locks: DashMap<GroupId, Arc<Mutex<()>>>,
}

impl<R: Repository> SessionOrchestrator<R> {
    pub fn new(
        repository: R,
        words: Box<dyn WordSource>,
        dictionary: Box<dyn Dictionary>,
        clock: Arc<dyn Clock>,
        settings: Settings,
    ) -> Self {
        Self {
            repository,
            words,
            dictionary,
            clock,
            settings,
            group_locks: DashMap::new(),
        }
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    fn group_lock(&self, group: &GroupId) -> Arc<Mutex<()>> {
        // Clone the Arc so the map shard is released before blocking on the mutex
        self.group_locks.entry(group.clone()).or_default().clone()
    }

    /// Submit a guess for a group
    ///
    /// # Errors
    /// Returns `GameError` on storage failure or persistent write conflicts.
    /// A rejected submission is `Ok(SubmissionOutcome::Rejected(_))`.
    pub fn submit(
        &self,
        group: &GroupId,
        user: &UserId,
        raw_word: &str,
    ) -> Result<SubmissionOutcome, GameError> {
        let lock = self.group_lock(group);
        let _guard = lock.lock();

        for attempt in 1..=MAX_SUBMIT_ATTEMPTS {
            match self.try_submit(group, user, raw_word) {
                Err(GameError::Repository(RepositoryError::Conflict(reason))) => {
                    debug!(%group, %user, attempt, %reason, "submission conflicted, revalidating");
                }
                other => return other,
            }
        }

        Err(GameError::SubmissionContention {
            group: group.clone(),
            attempts: MAX_SUBMIT_ATTEMPTS,
        })
    }

    fn try_submit(
        &self,
        group: &GroupId,
        user: &UserId,
        raw_word: &str,
    ) -> Result<SubmissionOutcome, GameError> {
        let record = if self.settings.auto_start {
            Some(self.active_or_create(group)?)
        } else {
            self.repository.find_active_session(group)?
        };
        let session = record.as_ref().map(restore).transpose()?;

        let now = self.clock.now();
        let last = self.repository.last_submission(user, group)?;
        let word = match self.settings.policy.validate(
            session.as_ref(),
            user,
            raw_word,
            last,
            now,
            self.dictionary.as_ref(),
        ) {
            Ok(word) => word,
            Err(rejection) => {
                debug!(%group, %user, ?rejection, "submission rejected");
                return Ok(SubmissionOutcome::Rejected(rejection));
            }
        };

        // validate() only admits a word when an active session exists
        let (Some(record), Some(mut session)) = (record, session) else {
            return Ok(SubmissionOutcome::Rejected(Rejection::NoActiveSession));
        };

        let scored = session.score(&word).map_err(|source| GameError::CorruptSession {
            session: record.id,
            source,
        })?;
        let novelty = novelty::attribute(session.board(), &scored);
        let expected_moves = session.guesses_used();
        let status = session.append_guess(user.clone(), scored.clone())?;

        let move_record = MoveRecord {
            session_id: record.id,
            user_id: user.clone(),
            word,
            novelty,
            created_at: now,
        };
        if let Err(e) = self
            .repository
            .record_move(move_record, status, expected_moves)
        {
            warn!(%group, session = %record.id, error = %e, "failed to persist move");
            return Err(e.into());
        }

        info!(
            %group,
            %user,
            session = %record.id,
            guess = %scored,
            new_correct = novelty.new_correct,
            new_present = novelty.new_present,
            ?status,
            "guess accepted"
        );

        let receipt = Receipt {
            session_id: record.id,
            scored,
            novelty,
            guesses_used: session.guesses_used(),
            max_guesses: session.max_guesses(),
            answer: session.target_word().cloned(),
        };
        Ok(match status {
            SessionStatus::Won => SubmissionOutcome::Won(receipt),
            SessionStatus::Lost => SubmissionOutcome::Lost(receipt),
            SessionStatus::Active | SessionStatus::Incomplete => {
                SubmissionOutcome::Accepted(receipt)
            }
        })
    }

    /// Open a session for the group unless one is already active
    ///
    /// This is what a scheduled rollover calls after `reset_all`.
    ///
    /// # Errors
    /// Returns `GameError` on storage failure or repeated creation conflicts.
    pub fn start_session(&self, group: &GroupId) -> Result<SessionId, GameError> {
        let lock = self.group_lock(group);
        let _guard = lock.lock();
        Ok(self.active_or_create(group)?.id)
    }

    fn active_or_create(&self, group: &GroupId) -> Result<SessionRecord, GameError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            // The flag is cheaper than loading the record with its moves
            if self.repository.has_active_session(group)? {
                if let Some(record) = self.repository.find_active_session(group)? {
                    return Ok(record);
                }
            }

            let new_session = NewSession {
                group_id: group.clone(),
                target: self.words.random_word(),
                max_guesses: self.settings.max_guesses,
                created_at: self.clock.now(),
            };
            match self.repository.insert_session(new_session) {
                Ok(record) => {
                    info!(%group, session = %record.id, "started new session");
                    return Ok(record);
                }
                Err(RepositoryError::Conflict(reason)) => {
                    debug!(%group, attempt, %reason, "session creation raced, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(GameError::CreationContention {
            group: group.clone(),
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    /// Scored guesses of the group's most recent session, in board order
    ///
    /// # Errors
    /// Returns `GameError` on storage failure or an unreadable session.
    pub fn current_board(&self, group: &GroupId) -> Result<Vec<ScoredGuess>, GameError> {
        Ok(self
            .latest_session(group)?
            .map(|session| session.board().cloned().collect())
            .unwrap_or_default())
    }

    /// Letter summary of the current board
    ///
    /// # Errors
    /// Returns `GameError` on storage failure or an unreadable session.
    pub fn keyboard(&self, group: &GroupId) -> Result<Keyboard, GameError> {
        Ok(Keyboard::from_board(&self.current_board(group)?))
    }

    fn latest_session(&self, group: &GroupId) -> Result<Option<GameSession>, GameError> {
        self.repository
            .find_latest_session(group)?
            .as_ref()
            .map(restore)
            .transpose()
    }

    /// Close every active session as `Incomplete`
    ///
    /// # Errors
    /// Returns `GameError` on storage failure.
    pub fn reset_all(&self) -> Result<usize, GameError> {
        let reset = self.repository.reset_active_sessions()?;
        info!(sessions = reset, "reset all active sessions");
        Ok(reset)
    }

    /// Recompute every stored move's novelty from an empty board, in original order
    ///
    /// Each session is replayed under its group's lock so live submissions are not lost.
    ///
    /// # Errors
    /// Returns the first storage or replay failure.
    pub fn rebuild_statistics(&self) -> Result<RebuildReport, GameError> {
        let sessions = self.repository.all_sessions()?;

        let reports = sessions
            .par_iter()
            .map(|s| self.rebuild_session(&s.group_id, s.id))
            .collect::<Result<Vec<_>, GameError>>()?;

        let report = reports.into_iter().fold(RebuildReport::default(), |acc, r| RebuildReport {
            sessions: acc.sessions + r.sessions,
            moves: acc.moves + r.moves,
            corrected: acc.corrected + r.corrected,
        });
        info!(
            sessions = report.sessions,
            moves = report.moves,
            corrected = report.corrected,
            "rebuilt statistics"
        );
        Ok(report)
    }

    fn rebuild_session(&self, group: &GroupId, id: SessionId) -> Result<RebuildReport, GameError> {
        let lock = self.group_lock(group);
        let _guard = lock.lock();

        let Some(record) = self.repository.find_session(id)? else {
            return Ok(RebuildReport::default());
        };
        let session = restore(&record)?;
        let board: Vec<ScoredGuess> = session.board().cloned().collect();
        let counts = novelty::replay(&board);

        let corrected = record
            .moves
            .iter()
            .zip(&counts)
            .filter(|(m, count)| m.novelty != **count)
            .count();
        if corrected > 0 {
            self.repository.update_novelty(id, &counts)?;
        }

        Ok(RebuildReport {
            sessions: 1,
            moves: counts.len(),
            corrected,
        })
    }

    /// Administrative restart: rebuild statistics if asked, otherwise reset sessions
    ///
    /// # Errors
    /// Returns `GameError` on storage failure.
    pub fn restart(&self, is_admin: bool, rebuild_stats: bool) -> Result<RestartOutcome, GameError> {
        if !is_admin {
            return Ok(RestartOutcome::Unauthorized);
        }
        if rebuild_stats {
            Ok(RestartOutcome::StatisticsRebuilt(self.rebuild_statistics()?))
        } else {
            Ok(RestartOutcome::SessionsReset(self.reset_all()?))
        }
    }

    /// Lifetime statistics for a user across all groups
    ///
    /// # Errors
    /// Returns `GameError` on storage failure.
    pub fn user_stats(&self, user: &UserId) -> Result<UserStats, GameError> {
        let moves = self.repository.moves_for_user(user)?;

        let mut ids: Vec<SessionId> = moves.iter().map(|m| m.session_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.repository.find_session(id)? {
                sessions.push(record);
            }
        }

        Ok(UserStats::aggregate(
            user.clone(),
            &moves,
            &sessions,
            self.settings.par,
        ))
    }

    /// Time left before `user` may submit again in `group`
    ///
    /// # Errors
    /// Returns `GameError` on storage failure.
    pub fn remaining_cooldown(&self, group: &GroupId, user: &UserId) -> Result<Duration, GameError> {
        let last = self.repository.last_submission(user, group)?;
        Ok(self
            .settings
            .policy
            .remaining_cooldown(last, self.clock.now()))
    }

    /// Most recent finished sessions of the group, newest first
    ///
    /// # Errors
    /// Returns `GameError` on storage failure.
    pub fn recent_games(&self, group: &GroupId) -> Result<Vec<CompletedGame>, GameError> {
        Ok(self
            .repository
            .recent_completed_sessions(group, self.settings.recent_games_limit)?
            .into_iter()
            .map(|record| CompletedGame {
                session_id: record.id,
                status: record.status,
                guesses_used: record.moves.len(),
                final_guess: record.moves.last().map(|m| m.word.clone()),
                answer: record.target,
            })
            .collect())
    }

    /// Answer of the group's latest session, once that session is over
    ///
    /// # Errors
    /// Returns `GameError` on storage failure or an unreadable session.
    pub fn reveal_answer(&self, group: &GroupId) -> Result<Option<RevealedAnswer>, GameError> {
        Ok(self.latest_session(group)?.and_then(|session| {
            session.target_word().map(|word| RevealedAnswer {
                definition: self.dictionary.definition(word).map(str::to_string),
                word: word.clone(),
            })
        }))
    }

    /// Whether a word can be a target and whether it can be submitted
    ///
    /// # Errors
    /// Returns `WordError` if the text is not a word at all.
    pub fn lookup_word(&self, raw_word: &str) -> Result<WordLookup, WordError> {
        let word = Word::new(raw_word.trim())?;
        Ok(WordLookup {
            possible_target: self.words.contains(&word),
            submittable: self.dictionary.is_valid_word(&word),
            word,
        })
    }
}

fn restore(record: &SessionRecord) -> Result<GameSession, GameError> {
    record.to_session().map_err(|source| GameError::CorruptSession {
        session: record.id,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LetterClassification;
    use crate::game::clock::ManualClock;
    use crate::game::policy::LengthError;
    use crate::storage::MemoryRepository;
    use crate::words::{WordDictionary, WordList};
    use chrono::{DateTime, TimeDelta};

    const VOCABULARY: [&str; 12] = [
        "crane", "slate", "trace", "audio", "stone", "spend", "stare", "pilot", "ghost", "fruit",
        "music", "lolly",
    ];

    struct Fixture {
        game: SessionOrchestrator<MemoryRepository>,
        clock: Arc<ManualClock>,
    }

    fn fixture_with(target: &str, settings: Settings) -> Fixture {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let words = WordList::new(vec![Word::new(target).unwrap()], "test").unwrap();
        let dictionary =
            WordDictionary::from_words(VOCABULARY.iter().map(|w| Word::new(w).unwrap()));
        let game = SessionOrchestrator::new(
            MemoryRepository::new(),
            Box::new(words),
            Box::new(dictionary),
            clock.clone(),
            settings,
        );
        Fixture { game, clock }
    }

    fn fixture(target: &str) -> Fixture {
        fixture_with(target, Settings::default())
    }

    fn group() -> GroupId {
        GroupId::new("guild")
    }

    fn submit(f: &Fixture, user: &str, word: &str) -> SubmissionOutcome {
        f.game.submit(&group(), &UserId::new(user), word).unwrap()
    }

    #[test]
    fn first_submission_starts_session_and_is_accepted() {
        let f = fixture("stone");
        let SubmissionOutcome::Accepted(receipt) = submit(&f, "alice", "slate") else {
            panic!("expected acceptance");
        };
        assert_eq!(receipt.guesses_used, 1);
        assert_eq!(receipt.max_guesses, 6);
        assert_eq!(receipt.answer, None);
        assert_eq!(f.game.current_board(&group()).unwrap().len(), 1);
    }

    #[test]
    fn winning_guess_reveals_answer() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        let SubmissionOutcome::Won(receipt) = submit(&f, "bob", "STONE") else {
            panic!("expected win");
        };
        assert!(receipt.scored.is_correct_answer());
        assert_eq!(receipt.answer, Some(Word::new("stone").unwrap()));

        let revealed = f.game.reveal_answer(&group()).unwrap().unwrap();
        assert_eq!(revealed.word.text(), "STONE");
        assert_eq!(revealed.definition, None);
    }

    #[test]
    fn answer_hidden_while_active() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        assert_eq!(f.game.reveal_answer(&group()).unwrap(), None);
    }

    #[test]
    fn six_misses_lose() {
        let f = fixture("stone");
        let words = ["crane", "slate", "audio", "pilot", "ghost"];
        for (i, word) in words.iter().enumerate() {
            assert!(matches!(
                submit(&f, &format!("u{i}"), word),
                SubmissionOutcome::Accepted(_)
            ));
        }
        let SubmissionOutcome::Lost(receipt) = submit(&f, "u5", "music") else {
            panic!("expected loss");
        };
        assert_eq!(receipt.guesses_used, 6);
        assert!(receipt.answer.is_some());
    }

    #[test]
    fn duplicate_submission_leaves_board_unchanged() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        assert_eq!(
            submit(&f, "alice", "crane"),
            SubmissionOutcome::Rejected(Rejection::AlreadySubmittedThisRound)
        );
        assert_eq!(f.game.current_board(&group()).unwrap().len(), 1);
    }

    #[test]
    fn cooldown_spans_sessions_in_same_group() {
        let f = fixture("stone");
        submit(&f, "alice", "stone");

        // New session opens on demand, but alice is still cooling down
        let outcome = submit(&f, "alice", "slate");
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(Rejection::UserOnCooldown {
                remaining: Duration::from_secs(12 * 3600)
            })
        );

        f.clock.advance(TimeDelta::hours(12) - TimeDelta::seconds(1));
        assert!(matches!(
            submit(&f, "alice", "slate"),
            SubmissionOutcome::Rejected(Rejection::UserOnCooldown { .. })
        ));

        f.clock.advance(TimeDelta::seconds(1));
        assert!(matches!(
            submit(&f, "alice", "slate"),
            SubmissionOutcome::Accepted(_)
        ));
    }

    #[test]
    fn cooldown_is_per_group() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        let other = GroupId::new("other");
        assert!(matches!(
            f.game.submit(&other, &"alice".into(), "slate").unwrap(),
            SubmissionOutcome::Accepted(_)
        ));
        assert_eq!(
            f.game.remaining_cooldown(&other, &"alice".into()).unwrap(),
            Duration::from_secs(12 * 3600)
        );
        assert_eq!(
            f.game.remaining_cooldown(&other, &"bob".into()).unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn input_rejections() {
        let f = fixture("stone");
        assert_eq!(
            submit(&f, "alice", "ston"),
            SubmissionOutcome::Rejected(Rejection::InvalidLength(LengthError::TooShort))
        );
        assert_eq!(
            submit(&f, "alice", "stones"),
            SubmissionOutcome::Rejected(Rejection::InvalidLength(LengthError::TooLong))
        );
        assert_eq!(
            submit(&f, "alice", "qqqqq"),
            SubmissionOutcome::Rejected(Rejection::NotAWord)
        );
        assert!(f.game.current_board(&group()).unwrap().is_empty());
    }

    #[test]
    fn without_auto_start_submissions_wait_for_schedule() {
        let f = fixture_with(
            "stone",
            Settings {
                auto_start: false,
                ..Settings::default()
            },
        );
        assert_eq!(
            submit(&f, "alice", "slate"),
            SubmissionOutcome::Rejected(Rejection::NoActiveSession)
        );

        let first = f.game.start_session(&group()).unwrap();
        assert_eq!(f.game.start_session(&group()).unwrap(), first);
        assert!(matches!(
            submit(&f, "alice", "slate"),
            SubmissionOutcome::Accepted(_)
        ));
    }

    #[test]
    fn reset_marks_incomplete_and_next_start_supersedes() {
        let f = fixture_with(
            "stone",
            Settings {
                auto_start: false,
                ..Settings::default()
            },
        );
        let first = f.game.start_session(&group()).unwrap();
        submit(&f, "alice", "slate");

        assert_eq!(f.game.reset_all().unwrap(), 1);
        assert_eq!(
            submit(&f, "bob", "crane"),
            SubmissionOutcome::Rejected(Rejection::NoActiveSession)
        );

        let recent = f.game.recent_games(&group()).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].status, SessionStatus::Incomplete);
        assert_eq!(recent[0].final_guess, Some(Word::new("slate").unwrap()));
        assert_eq!(recent[0].answer.text(), "STONE");

        let second = f.game.start_session(&group()).unwrap();
        assert_ne!(first, second);
        assert!(f.game.current_board(&group()).unwrap().is_empty());
    }

    #[test]
    fn persistence_failure_leaves_no_partial_state() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");

        f.game.repository().fail_next_writes(1);
        let result = f.game.submit(&group(), &"bob".into(), "crane");
        assert!(matches!(
            result,
            Err(GameError::Repository(RepositoryError::Unavailable(_)))
        ));
        assert_eq!(f.game.current_board(&group()).unwrap().len(), 1);
        assert_eq!(
            f.game.remaining_cooldown(&group(), &"bob".into()).unwrap(),
            Duration::ZERO
        );

        // Nothing was half-applied, so bob can simply retry
        assert!(matches!(
            submit(&f, "bob", "crane"),
            SubmissionOutcome::Accepted(_)
        ));
    }

    #[test]
    fn conflicting_write_is_revalidated_and_retried() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");

        f.game.repository().conflict_next_writes(1);
        let SubmissionOutcome::Accepted(receipt) = submit(&f, "bob", "crane") else {
            panic!("expected acceptance after retry");
        };
        assert_eq!(receipt.guesses_used, 2);
        assert_eq!(f.game.current_board(&group()).unwrap().len(), 2);
    }

    #[test]
    fn persistent_write_conflicts_give_up() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");

        f.game.repository().conflict_next_writes(MAX_SUBMIT_ATTEMPTS);
        let result = f.game.submit(&group(), &"bob".into(), "crane");
        assert!(matches!(
            result,
            Err(GameError::SubmissionContention { attempts: MAX_SUBMIT_ATTEMPTS, .. })
        ));
        assert_eq!(f.game.current_board(&group()).unwrap().len(), 1);
        assert_eq!(
            f.game.remaining_cooldown(&group(), &"bob".into()).unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn creation_race_is_retried() {
        let f = fixture("stone");
        f.game.repository().conflict_next_inserts(1);

        let id = f.game.start_session(&group()).unwrap();
        assert_eq!(f.game.start_session(&group()).unwrap(), id);
        assert!(matches!(
            submit(&f, "alice", "slate"),
            SubmissionOutcome::Accepted(_)
        ));
        assert_eq!(f.game.repository().all_sessions().unwrap().len(), 1);
    }

    #[test]
    fn persistent_creation_conflicts_give_up() {
        let f = fixture("stone");
        f.game.repository().conflict_next_inserts(MAX_CREATE_ATTEMPTS);

        assert!(matches!(
            f.game.start_session(&group()),
            Err(GameError::CreationContention { attempts: MAX_CREATE_ATTEMPTS, .. })
        ));
        assert!(f.game.repository().all_sessions().unwrap().is_empty());

        // Contention has cleared, so the next call opens the session
        assert!(f.game.start_session(&group()).is_ok());
    }

    #[test]
    fn novelty_credits_first_discovery_only() {
        let f = fixture("stone");
        let SubmissionOutcome::Accepted(first) = submit(&f, "alice", "slate") else {
            panic!("expected acceptance");
        };
        let SubmissionOutcome::Accepted(second) = submit(&f, "bob", "spend") else {
            panic!("expected acceptance");
        };

        assert_eq!(first.scored.classifications()[0], LetterClassification::Correct);
        assert_eq!(first.novelty.new_correct, 2);
        // S at 0 was already revealed by alice
        assert_eq!(second.novelty.new_correct, 1);
    }

    #[test]
    fn rebuild_is_idempotent_and_matches_live_counts() {
        let f = fixture("stone");
        for (user, word) in [("a", "slate"), ("b", "spend"), ("c", "stare"), ("d", "stone")] {
            submit(&f, user, word);
        }
        let live: Vec<NoveltyCount> = f
            .game
            .repository()
            .all_sessions()
            .unwrap()
            .iter()
            .flat_map(|s| s.moves.iter().map(|m| m.novelty))
            .collect();

        // Corrupt the stored counts, then repair them
        let id = f.game.repository().all_sessions().unwrap()[0].id;
        f.game
            .repository()
            .update_novelty(id, &[NoveltyCount::default(); 4])
            .unwrap();

        let first = f.game.rebuild_statistics().unwrap();
        assert_eq!(first.sessions, 1);
        assert_eq!(first.moves, 4);
        assert!(first.corrected > 0);

        let second = f.game.rebuild_statistics().unwrap();
        assert_eq!(second.corrected, 0);

        let rebuilt: Vec<NoveltyCount> = f
            .game
            .repository()
            .all_sessions()
            .unwrap()
            .iter()
            .flat_map(|s| s.moves.iter().map(|m| m.novelty))
            .collect();
        assert_eq!(rebuilt, live);
    }

    #[test]
    fn restart_requires_admin() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");

        assert_eq!(f.game.restart(false, false).unwrap(), RestartOutcome::Unauthorized);
        assert_eq!(
            f.game.restart(true, false).unwrap(),
            RestartOutcome::SessionsReset(1)
        );
        assert!(matches!(
            f.game.restart(true, true).unwrap(),
            RestartOutcome::StatisticsRebuilt(RebuildReport { sessions: 1, .. })
        ));
    }

    #[test]
    fn user_stats_across_sessions() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        submit(&f, "bob", "stone");

        f.clock.advance(TimeDelta::hours(12));
        submit(&f, "alice", "slate");
        for (i, word) in ["crane", "audio", "pilot", "ghost", "fruit"].iter().enumerate() {
            submit(&f, &format!("u{i}"), word);
        }

        let alice = f.game.user_stats(&"alice".into()).unwrap();
        assert_eq!(alice.games_played, 2);
        assert_eq!(alice.games_won, 1);
        assert_eq!(alice.games_lost, 1);
        // won in 2: -2, lost: +4
        assert_eq!(alice.par_score, 2);
        assert_eq!(alice.top_word, Some((Word::new("slate").unwrap(), 2)));

        let bob = f.game.user_stats(&"bob".into()).unwrap();
        assert_eq!(bob.games_won, 1);
        assert_eq!(bob.new_correct, 3);
    }

    #[test]
    fn keyboard_reflects_board() {
        let f = fixture("stone");
        submit(&f, "alice", "slate");
        let keyboard = f.game.keyboard(&group()).unwrap();
        assert_eq!(keyboard.state(b'S'), crate::game::KeyState::Correct);
        assert_eq!(keyboard.state(b'L'), crate::game::KeyState::Absent);
        assert_eq!(keyboard.state(b'Z'), crate::game::KeyState::Unused);
    }

    #[test]
    fn lookup_word_reports_both_lists() {
        let f = fixture("stone");
        let stone = f.game.lookup_word("stone").unwrap();
        assert!(stone.possible_target && stone.submittable);

        let crane = f.game.lookup_word("crane").unwrap();
        assert!(!crane.possible_target && crane.submittable);

        let unknown = f.game.lookup_word("zzzzz").unwrap();
        assert!(!unknown.possible_target && !unknown.submittable);

        assert!(f.game.lookup_word("12345").is_err());
    }

    #[test]
    fn concurrent_submissions_in_one_group_are_serialized() {
        let f = fixture("stone");
        let words = ["crane", "slate", "audio", "pilot", "ghost", "fruit", "music", "spend"];

        std::thread::scope(|scope| {
            for (i, word) in words.iter().enumerate() {
                let game = &f.game;
                scope.spawn(move || {
                    game.submit(&group(), &UserId::new(format!("user{i}")), word)
                        .unwrap()
                });
            }
        });

        // Exactly six guesses landed; the session ended Lost and a fresh one may have opened
        let sessions = f.game.repository().all_sessions().unwrap();
        let first = &sessions[0];
        assert_eq!(first.moves.len(), 6);
        assert_eq!(first.status, SessionStatus::Lost);
        let users: std::collections::HashSet<_> =
            first.moves.iter().map(|m| m.user_id.clone()).collect();
        assert_eq!(users.len(), 6);
        let total: usize = sessions.iter().map(|s| s.moves.len()).sum();
        assert_eq!(total, words.len());
    }

    #[test]
    fn groups_are_independent() {
        let f = fixture("stone");
        std::thread::scope(|scope| {
            for g in 0..8 {
                let game = &f.game;
                scope.spawn(move || {
                    let group = GroupId::new(format!("g{g}"));
                    for (i, word) in ["slate", "stone"].iter().enumerate() {
                        game.submit(&group, &UserId::new(format!("u{i}")), word)
                            .unwrap();
                    }
                });
            }
        });

        let sessions = f.game.repository().all_sessions().unwrap();
        assert_eq!(sessions.len(), 8);
        assert!(sessions.iter().all(|s| s.status == SessionStatus::Won));
    }
}
