//! Per-user statistics aggregated from move history

use super::ids::{SessionId, UserId};
use super::session::SessionStatus;
use crate::core::Word;
use crate::storage::{MoveRecord, SessionRecord};
use rustc_hash::FxHashMap;

/// Par for a session; a win scores `guesses - par`, a loss scores `par`
pub const DEFAULT_PAR: i64 = 4;

/// Lifetime statistics for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user: UserId,
    pub new_present: u32,
    pub new_correct: u32,
    pub games_played: usize,
    pub games_won: usize,
    pub games_lost: usize,
    /// Golf-style: lower is better
    pub par_score: i64,
    /// Most submitted word and how often; ties go to the word seen first
    pub top_word: Option<(Word, usize)>,
}

impl UserStats {
    /// Fold a user's moves (oldest first) and the sessions they belong to
    ///
    /// Sessions count once each no matter how many moves reference them.
    /// `Incomplete` and still-`Active` sessions count as played, not won or lost.
    #[must_use]
    pub fn aggregate(
        user: UserId,
        moves: &[MoveRecord],
        sessions: &[SessionRecord],
        par: i64,
    ) -> Self {
        let by_id: FxHashMap<SessionId, &SessionRecord> =
            sessions.iter().map(|s| (s.id, s)).collect();

        let mut stats = Self {
            user,
            new_present: 0,
            new_correct: 0,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            par_score: 0,
            top_word: None,
        };

        let mut played: Vec<SessionId> = Vec::new();
        let mut frequency: FxHashMap<&Word, usize> = FxHashMap::default();
        let mut first_seen: Vec<&Word> = Vec::new();

        for m in moves {
            stats.new_present += u32::from(m.novelty.new_present);
            stats.new_correct += u32::from(m.novelty.new_correct);

            if !played.contains(&m.session_id) {
                played.push(m.session_id);
            }

            let seen = frequency.entry(&m.word).or_insert(0);
            if *seen == 0 {
                first_seen.push(&m.word);
            }
            *seen += 1;
        }

        stats.games_played = played.len();
        for session in played.iter().filter_map(|id| by_id.get(id)) {
            match session.status {
                SessionStatus::Won => {
                    stats.games_won += 1;
                    stats.par_score += session.moves.len() as i64 - par;
                }
                SessionStatus::Lost => {
                    stats.games_lost += 1;
                    stats.par_score += par;
                }
                SessionStatus::Active | SessionStatus::Incomplete => {}
            }
        }

        // Strictly greater keeps the earliest word on ties
        let mut top: Option<(&Word, usize)> = None;
        for word in first_seen {
            let count = frequency[word];
            if top.is_none_or(|(_, best)| count > best) {
                top = Some((word, count));
            }
        }
        stats.top_word = top.map(|(word, count)| (word.clone(), count));

        stats
    }

    /// Share of decided games that were won, in percent
    #[must_use]
    pub fn win_percent(&self) -> f64 {
        let decided = self.games_won + self.games_lost;
        if decided == 0 {
            0.0
        } else {
            100.0 * self.games_won as f64 / decided as f64
        }
    }
}
