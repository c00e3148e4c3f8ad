//! First-discovery credit for letter positions
//!
//! A guess earns credit for a `Correct` or `Present` position only if no earlier
//! guess in the same session put that same letter at that same position,
//! whatever that earlier guess was scored.

use crate::core::{LetterClassification, ScoredGuess};

/// Newly revealed positions of one guess
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoveltyCount {
    pub new_correct: u8,
    pub new_present: u8,
}

impl NoveltyCount {
    #[must_use]
    pub const fn total(self) -> u16 {
        self.new_correct as u16 + self.new_present as u16
    }
}

/// Count the positions `new_guess` reveals for the first time
///
/// # Examples
/// ```
/// use shared_wordle::core::score;
/// use shared_wordle::game::attribute;
///
/// let first = score("spend", "stone").unwrap();
/// let second = score("stare", "stone").unwrap();
///
/// // S was already placed at position 0 by the first guess
/// let novelty = attribute(&[first], &second);
/// assert_eq!(novelty.new_correct, 2); // T and E
/// ```
#[must_use]
pub fn attribute<'a, I>(prior_guesses: I, new_guess: &ScoredGuess) -> NoveltyCount
where
    I: IntoIterator<Item = &'a ScoredGuess>,
    I::IntoIter: Clone,
{
    let prior = prior_guesses.into_iter();
    let mut count = NoveltyCount::default();

    for (position, scored) in new_guess.letters().enumerate() {
        if scored.classification == LetterClassification::Absent {
            continue;
        }

        let seen_before = prior
            .clone()
            .any(|guess| guess.word().letters().get(position) == Some(&scored.letter));
        if seen_before {
            continue;
        }

        match scored.classification {
            LetterClassification::Correct => count.new_correct += 1,
            LetterClassification::Present => count.new_present += 1,
            LetterClassification::Absent => {}
        }
    }

    count
}

/// Replay a full history from an empty board, one count per guess in order
#[must_use]
pub fn replay(history: &[ScoredGuess]) -> Vec<NoveltyCount> {
    history
        .iter()
        .enumerate()
        .map(|(i, guess)| attribute(&history[..i], guess))
        .collect()
}
