//! One shared puzzle: target word, ordered guess history and lifecycle
//!
//! ```text
//! Active --append--> Active | Won | Lost
//! Active --reset---> Incomplete
//! ```
//! `Won`, `Lost` and `Incomplete` are terminal.

use super::ids::UserId;
use crate::core::{ScoreError, ScoredGuess, Word};
use thiserror::Error;

/// Standard guess budget of a session
pub const DEFAULT_MAX_GUESSES: usize = 6;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Active,
    Won,
    Lost,
    /// Closed by an administrative reset before reaching Won or Lost
    Incomplete,
}

impl SessionStatus {
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// A guess on the shared board together with who made it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub submitter: UserId,
    pub scored: ScoredGuess,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is closed ({0:?})")]
    SessionClosed(SessionStatus),
    #[error("guess has {actual} letters, session expects {expected}")]
    GuessLength { expected: usize, actual: usize },
}

/// A shared Wordle board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    target: Word,
    guesses: Vec<Guess>,
    status: SessionStatus,
    max_guesses: usize,
}

impl GameSession {
    /// Start a fresh session with no guesses
    #[must_use]
    pub const fn new(target: Word, max_guesses: usize) -> Self {
        Self {
            target,
            guesses: Vec::new(),
            status: SessionStatus::Active,
            max_guesses,
        }
    }

    /// Rebuild a session from persisted parts
    pub(crate) const fn restore(
        target: Word,
        guesses: Vec<Guess>,
        status: SessionStatus,
        max_guesses: usize,
    ) -> Self {
        Self {
            target,
            guesses,
            status,
            max_guesses,
        }
    }

    /// Append a scored guess and recompute the status
    ///
    /// # Errors
    /// `SessionClosed` if the session is terminal, `GuessLength` if the guess
    /// does not fit the board.
    pub fn append_guess(
        &mut self,
        submitter: UserId,
        scored: ScoredGuess,
    ) -> Result<SessionStatus, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionClosed(self.status));
        }
        if scored.len() != self.target.len() {
            return Err(SessionError::GuessLength {
                expected: self.target.len(),
                actual: scored.len(),
            });
        }

        let won = scored.is_correct_answer();
        self.guesses.push(Guess { submitter, scored });

        self.status = if won {
            SessionStatus::Won
        } else if self.guesses.len() >= self.max_guesses {
            SessionStatus::Lost
        } else {
            SessionStatus::Active
        };
        Ok(self.status)
    }

    /// Score a word against the hidden target without revealing it
    ///
    /// # Errors
    /// Returns `ScoreError::LengthMismatch` if the word does not fit the board.
    pub fn score(&self, guess: &Word) -> Result<ScoredGuess, ScoreError> {
        ScoredGuess::calculate(guess, &self.target)
    }

    /// Close an active session without a result. Terminal sessions are left untouched.
    pub(crate) fn mark_incomplete(&mut self) -> bool {
        if self.status == SessionStatus::Active {
            self.status = SessionStatus::Incomplete;
            true
        } else {
            false
        }
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn guess_history(&self) -> &[Guess] {
        &self.guesses
    }

    /// Scored guesses in board order
    pub fn board(&self) -> impl Iterator<Item = &ScoredGuess> + Clone {
        self.guesses.iter().map(|g| &g.scored)
    }

    /// The target, only once the session is terminal
    #[must_use]
    pub fn target_word(&self) -> Option<&Word> {
        self.status.is_terminal().then_some(&self.target)
    }

    /// Unconditional access for persistence
    pub(crate) const fn hidden_target(&self) -> &Word {
        &self.target
    }

    #[must_use]
    pub fn has_submitted(&self, user: &UserId) -> bool {
        self.guesses.iter().any(|g| &g.submitter == user)
    }

    #[inline]
    #[must_use]
    pub fn guesses_used(&self) -> usize {
        self.guesses.len()
    }

    #[inline]
    #[must_use]
    pub const fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    #[inline]
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.target.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(target: &str) -> GameSession {
        GameSession::new(Word::new(target).unwrap(), DEFAULT_MAX_GUESSES)
    }

    fn guess(session: &GameSession, word: &str) -> ScoredGuess {
        session.score(&Word::new(word).unwrap()).unwrap()
    }

    #[test]
    fn new_session_is_active_and_empty() {
        let s = session("crane");
        assert_eq!(s.status(), SessionStatus::Active);
        assert!(s.guess_history().is_empty());
        assert_eq!(s.max_guesses(), 6);
        assert_eq!(s.word_length(), 5);
    }

    #[test]
    fn target_hidden_until_terminal() {
        let mut s = session("crane");
        assert!(s.target_word().is_none());

        let g = guess(&s, "crane");
        s.append_guess("alice".into(), g).unwrap();
        assert_eq!(s.target_word().map(Word::text), Some("CRANE"));
    }

    #[test]
    fn exact_target_wins_immediately() {
        let mut s = session("crane");
        let g = guess(&s, "slate");
        assert_eq!(s.append_guess("a".into(), g).unwrap(), SessionStatus::Active);

        let g = guess(&s, "crane");
        assert_eq!(s.append_guess("b".into(), g).unwrap(), SessionStatus::Won);
        assert_eq!(s.guesses_used(), 2);
    }

    #[test]
    fn sixth_miss_loses() {
        let mut s = session("crane");
        for (i, word) in ["slate", "audio", "pilot", "ghost", "fruit"].iter().enumerate() {
            let g = guess(&s, word);
            let status = s.append_guess(UserId::new(format!("u{i}")), g).unwrap();
            assert_eq!(status, SessionStatus::Active);
        }

        let g = guess(&s, "music");
        assert_eq!(s.append_guess("u5".into(), g).unwrap(), SessionStatus::Lost);
    }

    #[test]
    fn win_on_last_guess_is_a_win() {
        let mut s = GameSession::new(Word::new("crane").unwrap(), 2);
        let g = guess(&s, "slate");
        s.append_guess("a".into(), g).unwrap();
        let g = guess(&s, "crane");
        assert_eq!(s.append_guess("b".into(), g).unwrap(), SessionStatus::Won);
    }

    #[test]
    fn terminal_session_rejects_guesses() {
        let mut s = session("crane");
        let g = guess(&s, "crane");
        s.append_guess("a".into(), g.clone()).unwrap();

        assert_eq!(
            s.append_guess("b".into(), g),
            Err(SessionError::SessionClosed(SessionStatus::Won))
        );
        assert_eq!(s.guesses_used(), 1);
    }

    #[test]
    fn wrong_length_guess_rejected() {
        let mut s = session("crane");
        let other = ScoredGuess::calculate(&Word::new("abc").unwrap(), &Word::new("abd").unwrap())
            .unwrap();
        assert_eq!(
            s.append_guess("a".into(), other),
            Err(SessionError::GuessLength {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn mark_incomplete_only_affects_active() {
        let mut s = session("crane");
        assert!(s.mark_incomplete());
        assert_eq!(s.status(), SessionStatus::Incomplete);
        assert!(s.target_word().is_some());
        assert!(!s.mark_incomplete());
    }

    #[test]
    fn has_submitted_tracks_users() {
        let mut s = session("crane");
        let g = guess(&s, "slate");
        s.append_guess("alice".into(), g).unwrap();
        assert!(s.has_submitted(&"alice".into()));
        assert!(!s.has_submitted(&"bob".into()));
        assert_eq!(s.board().count(), 1);
    }
}
