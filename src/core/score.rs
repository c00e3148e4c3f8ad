//! Per-letter scoring of a guess against a target word
//!
//! Classification follows the standard Wordle rules, including duplicate letters:
//! - `Correct`: letter in the correct position
//! - `Present`: letter in the target but at another position, while unclaimed occurrences remain
//! - `Absent`: letter not in the target, or all of its occurrences are already claimed

use super::word::{Word, WordError};
use std::fmt;
use thiserror::Error;

/// Feedback for a single letter of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LetterClassification {
    Absent,
    Present,
    Correct,
}

/// One guessed letter together with its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoredLetter {
    pub letter: u8,
    pub classification: LetterClassification,
}

/// Error returned when a guess cannot be scored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("guess has {guess} letters but target has {target}")]
    LengthMismatch { guess: usize, target: usize },
    #[error("invalid character in word: {0}")]
    InvalidCharacter(#[from] WordError),
}

/// A guess scored position by position against a target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoredGuess {
    word: Word,
    classifications: Vec<LetterClassification>,
}

impl ScoredGuess {
    /// Score `guess` against `target`
    ///
    /// # Algorithm
    /// 1. Count every letter of the target (26 counters)
    /// 2. First pass: mark exact matches `Correct` and consume their counts
    /// 3. Second pass, left to right: mark `Present` while the letter still has
    ///    unclaimed occurrences, otherwise `Absent`
    ///
    /// # Errors
    /// Returns `ScoreError::LengthMismatch` if the words differ in length.
    ///
    /// # Examples
    /// ```
    /// use shared_wordle::core::{LetterClassification::*, ScoredGuess, Word};
    ///
    /// let guess = Word::new("crane").unwrap();
    /// let target = Word::new("trace").unwrap();
    /// let scored = ScoredGuess::calculate(&guess, &target).unwrap();
    ///
    /// assert_eq!(scored.classifications(), &[Present, Correct, Correct, Absent, Correct]);
    /// ```
    pub fn calculate(guess: &Word, target: &Word) -> Result<Self, ScoreError> {
        if guess.len() != target.len() {
            return Err(ScoreError::LengthMismatch {
                guess: guess.len(),
                target: target.len(),
            });
        }

        let mut remaining = target.letter_counts();
        let mut result: Vec<Option<LetterClassification>> = vec![None; guess.len()];

        // First pass: exact matches consume their letter before any loose match
        for (i, (&g, &t)) in guess.letters().iter().zip(target.letters()).enumerate() {
            if g == t {
                result[i] = Some(LetterClassification::Correct);
                remaining[usize::from(g - b'A')] -= 1;
            }
        }

        // Second pass: loose matches, leftmost guess position first
        for (slot, &g) in result.iter_mut().zip(guess.letters()) {
            if slot.is_none() {
                let count = &mut remaining[usize::from(g - b'A')];
                *slot = Some(if *count > 0 {
                    *count -= 1;
                    LetterClassification::Present
                } else {
                    LetterClassification::Absent
                });
            }
        }

        Ok(Self {
            word: guess.clone(),
            classifications: result
                .into_iter()
                .map(|c| c.unwrap_or(LetterClassification::Absent))
                .collect(),
        })
    }

    /// The guessed word
    #[inline]
    #[must_use]
    pub const fn word(&self) -> &Word {
        &self.word
    }

    /// Classifications in board order
    #[inline]
    #[must_use]
    pub fn classifications(&self) -> &[LetterClassification] {
        &self.classifications
    }

    /// Iterate over (letter, classification) pairs in board order
    pub fn letters(&self) -> impl Iterator<Item = ScoredLetter> + '_ {
        self.word
            .letters()
            .iter()
            .zip(&self.classifications)
            .map(|(&letter, &classification)| ScoredLetter {
                letter,
                classification,
            })
    }

    /// Number of positions on the board
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classifications.len()
    }

    /// Always false for a scored word
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifications.is_empty()
    }

    /// True if every position is `Correct`
    #[must_use]
    pub fn is_correct_answer(&self) -> bool {
        self.classifications
            .iter()
            .all(|&c| c == LetterClassification::Correct)
    }

    /// Count positions with the given classification
    #[must_use]
    pub fn count(&self, classification: LetterClassification) -> usize {
        self.classifications
            .iter()
            .filter(|&&c| c == classification)
            .count()
    }

    /// Render the classifications as emoji squares
    ///
    /// # Examples
    /// ```
    /// use shared_wordle::core::score;
    ///
    /// let scored = score("crane", "trace").unwrap();
    /// assert_eq!(scored.to_emoji(), "🟨🟩🟩⬜🟩");
    /// ```
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.classifications
            .iter()
            .map(|c| match c {
                LetterClassification::Correct => '🟩',
                LetterClassification::Present => '🟨',
                LetterClassification::Absent => '⬜',
            })
            .collect()
    }
}

impl fmt::Display for ScoredGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.to_emoji())
    }
}

/// Score raw text against raw text
///
/// # Errors
/// Returns `ScoreError::InvalidCharacter` if either word has a character outside A-Z,
/// or `ScoreError::LengthMismatch` if they differ in length.
pub fn score(guess: &str, target: &str) -> Result<ScoredGuess, ScoreError> {
    let guess = Word::new(guess)?;
    let target = Word::new(target)?;
    ScoredGuess::calculate(&guess, &target)
}
