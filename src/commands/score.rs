//! Score command

use crate::core::{ScoreError, ScoredGuess, Word};

/// Score a guess against an explicit target, ignoring any dictionary
///
/// # Errors
///
/// Returns `ScoreError` if either word is malformed or the lengths differ.
pub fn score_words(guess: &str, target: &str) -> Result<ScoredGuess, ScoreError> {
    let guess = Word::new(guess.trim())?;
    let target = Word::new(target.trim())?;
    ScoredGuess::calculate(&guess, &target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LetterClassification::{Absent, Correct, Present};

    #[test]
    fn scores_trimmed_input() {
        let scored = score_words(" lolly ", "alloy").unwrap();
        assert_eq!(scored.classifications(), &[Present, Present, Correct, Absent, Correct]);
    }

    #[test]
    fn reports_length_mismatch() {
        assert!(matches!(
            score_words("crane", "cranes"),
            Err(ScoreError::LengthMismatch { .. })
        ));
        assert!(matches!(
            score_words("cr4ne", "crane"),
            Err(ScoreError::InvalidCharacter(_))
        ));
    }
}
