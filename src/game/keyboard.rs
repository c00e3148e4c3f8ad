//! Letter-by-letter summary of everything the board has revealed

use crate::core::{ALPHABET_SIZE, LetterClassification, ScoredGuess};

/// Best knowledge about one letter, ordered from least to most informative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyState {
    #[default]
    Unused,
    Absent,
    Present,
    Correct,
}

impl From<LetterClassification> for KeyState {
    fn from(classification: LetterClassification) -> Self {
        match classification {
            LetterClassification::Absent => Self::Absent,
            LetterClassification::Present => Self::Present,
            LetterClassification::Correct => Self::Correct,
        }
    }
}

/// QWERTY rows used for display
pub const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [KeyState; ALPHABET_SIZE],
}

impl Keyboard {
    /// Fold a board into per-letter states, keeping the strongest state seen
    pub fn from_board<'a>(board: impl IntoIterator<Item = &'a ScoredGuess>) -> Self {
        let mut keys = [KeyState::Unused; ALPHABET_SIZE];
        for guess in board {
            for scored in guess.letters() {
                let key = &mut keys[usize::from(scored.letter - b'A')];
                *key = (*key).max(scored.classification.into());
            }
        }
        Self { keys }
    }

    /// State of an uppercase ASCII letter; anything else is `Unused`
    #[must_use]
    pub fn state(&self, letter: u8) -> KeyState {
        if letter.is_ascii_uppercase() {
            self.keys[usize::from(letter - b'A')]
        } else {
            KeyState::Unused
        }
    }

    /// Letters with the given state, alphabetical
    #[must_use]
    pub fn letters_in(&self, state: KeyState) -> String {
        (b'A'..=b'Z')
            .filter(|&l| self.state(l) == state)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score;

    #[test]
    fn empty_board_is_all_unused() {
        let keyboard = Keyboard::from_board(std::iter::empty());
        assert_eq!(keyboard.letters_in(KeyState::Unused).len(), 26);
    }

    #[test]
    fn strongest_state_wins() {
        let board = [
            score("crane", "trace").unwrap(), // C present, R A E correct, N absent
            score("juice", "trace").unwrap(), // C correct now
        ];
        let keyboard = Keyboard::from_board(&board);

        assert_eq!(keyboard.state(b'C'), KeyState::Correct);
        assert_eq!(keyboard.state(b'R'), KeyState::Correct);
        assert_eq!(keyboard.state(b'N'), KeyState::Absent);
        assert_eq!(keyboard.state(b'J'), KeyState::Absent);
        assert_eq!(keyboard.state(b'T'), KeyState::Unused);
        assert_eq!(keyboard.state(b'a'), KeyState::Unused);
    }

    #[test]
    fn duplicate_absent_does_not_hide_present() {
        // Last L of LOLLY is absent but L stays correct from position 2
        let board = [score("lolly", "alloy").unwrap()];
        let keyboard = Keyboard::from_board(&board);
        assert_eq!(keyboard.state(b'L'), KeyState::Correct);
        assert_eq!(keyboard.state(b'O'), KeyState::Present);
    }

    #[test]
    fn rows_cover_alphabet() {
        let letters: usize = KEYBOARD_ROWS.iter().map(|r| r.len()).sum();
        assert_eq!(letters, 26);
    }
}
