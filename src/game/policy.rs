//! Admission checks for a submission
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. no active session
//! 2. user already on this board
//! 3. user still on cooldown in this group
//! 4. wrong length
//! 5. not in the dictionary
//!
//! Session and identity state is reported before anything about the word itself.

use super::ids::UserId;
use super::session::GameSession;
use crate::core::Word;
use crate::words::Dictionary;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Standard cooldown between a user's accepted submissions in one group
pub const DEFAULT_COOLDOWN_HOURS: i64 = 12;

/// Which way a submission missed the board length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthError {
    TooShort,
    TooLong,
}

/// Why a submission was not admitted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rejection {
    NoActiveSession,
    AlreadySubmittedThisRound,
    UserOnCooldown { remaining: Duration },
    InvalidLength(LengthError),
    NotAWord,
}

/// Submission admission policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    cooldown: TimeDelta,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::hours(DEFAULT_COOLDOWN_HOURS))
    }
}

impl SubmissionPolicy {
    /// A zero or negative window disables the cooldown
    #[must_use]
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            cooldown: cooldown.max(TimeDelta::zero()),
        }
    }

    #[must_use]
    pub const fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }

    /// Time left before a user may submit again; zero once the window has passed
    ///
    /// A submission exactly at the window edge is allowed.
    #[must_use]
    pub fn remaining_cooldown(
        &self,
        last_submission: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Duration {
        let Some(last) = last_submission else {
            return Duration::ZERO;
        };

        let elapsed = (now - last).max(TimeDelta::zero());
        (self.cooldown - elapsed)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Validate a raw submission, returning the normalized word on success
    ///
    /// # Errors
    /// Returns the first failing `Rejection` in check order.
    pub fn validate(
        &self,
        session: Option<&GameSession>,
        user: &UserId,
        raw_word: &str,
        last_submission: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        dictionary: &dyn Dictionary,
    ) -> Result<Word, Rejection> {
        let Some(session) = session.filter(|s| !s.status().is_terminal()) else {
            return Err(Rejection::NoActiveSession);
        };

        if session.has_submitted(user) {
            return Err(Rejection::AlreadySubmittedThisRound);
        }

        let remaining = self.remaining_cooldown(last_submission, now);
        if !remaining.is_zero() {
            return Err(Rejection::UserOnCooldown { remaining });
        }

        let raw_word = raw_word.trim();
        let length = raw_word.chars().count();
        let expected = session.word_length();
        if length < expected {
            return Err(Rejection::InvalidLength(LengthError::TooShort));
        }
        if length > expected {
            return Err(Rejection::InvalidLength(LengthError::TooLong));
        }

        match Word::new(raw_word) {
            Ok(word) if dictionary.is_valid_word(&word) => Ok(word),
            _ => Err(Rejection::NotAWord),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::DEFAULT_MAX_GUESSES;
    use crate::words::WordDictionary;

    fn dictionary() -> WordDictionary {
        WordDictionary::from_words(
            ["crane", "slate", "trace", "audio"]
                .iter()
                .map(|w| Word::new(w).unwrap()),
        )
    }

    fn session() -> GameSession {
        GameSession::new(Word::new("trace").unwrap(), DEFAULT_MAX_GUESSES)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn validate(
        session: Option<&GameSession>,
        user: &str,
        word: &str,
        last: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Word, Rejection> {
        SubmissionPolicy::default().validate(
            session,
            &UserId::new(user),
            word,
            last,
            now,
            &dictionary(),
        )
    }

    #[test]
    fn accepts_valid_word_and_normalizes() {
        let s = session();
        let word = validate(Some(&s), "alice", " crane ", None, t0()).unwrap();
        assert_eq!(word.text(), "CRANE");
    }

    #[test]
    fn no_session_wins_over_everything() {
        assert_eq!(
            validate(None, "alice", "x", None, t0()),
            Err(Rejection::NoActiveSession)
        );
    }

    #[test]
    fn terminal_session_is_not_active() {
        let mut s = session();
        let g = s.score(&Word::new("trace").unwrap()).unwrap();
        s.append_guess("bob".into(), g).unwrap();
        assert_eq!(
            validate(Some(&s), "alice", "crane", None, t0()),
            Err(Rejection::NoActiveSession)
        );
    }

    #[test]
    fn duplicate_submission_reported_before_bad_word() {
        let mut s = session();
        let g = s.score(&Word::new("crane").unwrap()).unwrap();
        s.append_guess("alice".into(), g).unwrap();

        assert_eq!(
            validate(Some(&s), "alice", "zz", None, t0()),
            Err(Rejection::AlreadySubmittedThisRound)
        );
    }

    #[test]
    fn cooldown_reported_before_bad_word() {
        let s = session();
        let last = t0();
        let now = last + TimeDelta::hours(2);
        assert_eq!(
            validate(Some(&s), "alice", "zz", Some(last), now),
            Err(Rejection::UserOnCooldown {
                remaining: Duration::from_secs(10 * 3600)
            })
        );
    }

    #[test]
    fn cooldown_boundary() {
        let s = session();
        let last = t0();
        let edge = last + TimeDelta::hours(DEFAULT_COOLDOWN_HOURS);

        let just_before = edge - TimeDelta::seconds(1);
        assert_eq!(
            validate(Some(&s), "alice", "crane", Some(last), just_before),
            Err(Rejection::UserOnCooldown {
                remaining: Duration::from_secs(1)
            })
        );

        assert!(validate(Some(&s), "alice", "crane", Some(last), edge).is_ok());
        assert!(
            validate(
                Some(&s),
                "alice",
                "crane",
                Some(last),
                edge + TimeDelta::seconds(1)
            )
            .is_ok()
        );
    }

    #[test]
    fn clock_skew_never_exceeds_window() {
        let policy = SubmissionPolicy::default();
        let last = t0();
        let remaining = policy.remaining_cooldown(Some(last), last - TimeDelta::hours(1));
        assert_eq!(remaining, Duration::from_secs(12 * 3600));
    }

    #[test]
    fn zero_cooldown_disables_check() {
        let policy = SubmissionPolicy::new(TimeDelta::zero());
        assert_eq!(policy.remaining_cooldown(Some(t0()), t0()), Duration::ZERO);

        let negative = SubmissionPolicy::new(TimeDelta::hours(-3));
        assert_eq!(negative.cooldown(), TimeDelta::zero());
    }

    #[test]
    fn length_checks() {
        let s = session();
        assert_eq!(
            validate(Some(&s), "alice", "cran", None, t0()),
            Err(Rejection::InvalidLength(LengthError::TooShort))
        );
        assert_eq!(
            validate(Some(&s), "alice", "cranes", None, t0()),
            Err(Rejection::InvalidLength(LengthError::TooLong))
        );
        assert_eq!(
            validate(Some(&s), "alice", "", None, t0()),
            Err(Rejection::InvalidLength(LengthError::TooShort))
        );
    }

    #[test]
    fn unknown_or_malformed_word_is_not_a_word() {
        let s = session();
        assert_eq!(
            validate(Some(&s), "alice", "xxxxx", None, t0()),
            Err(Rejection::NotAWord)
        );
        assert_eq!(
            validate(Some(&s), "alice", "cr4ne", None, t0()),
            Err(Rejection::NotAWord)
        );
    }
}
