//! Core domain types for the shared board
//!
//! Words and scoring, with no knowledge of sessions or storage.

mod score;
mod word;

pub use score::{LetterClassification, ScoreError, ScoredGuess, ScoredLetter, score};
pub use word::{ALPHABET_SIZE, WORD_LENGTH, Word, WordError};
