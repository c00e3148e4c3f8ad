//! Formatting utilities for terminal output

use crate::core::{LetterClassification, ScoredGuess, WORD_LENGTH};
use crate::game::{KeyState, LengthError, Rejection};
use colored::Colorize;
use indicatif::ProgressStyle;
use std::time::Duration;

/// Emoji square for one classification
#[must_use]
pub const fn classification_emoji(classification: LetterClassification) -> char {
    match classification {
        LetterClassification::Absent => '⬜',
        LetterClassification::Present => '🟨',
        LetterClassification::Correct => '🟩',
    }
}

/// Letters of a guess on colored tiles
#[must_use]
pub fn colored_guess(guess: &ScoredGuess) -> String {
    guess
        .letters()
        .map(|scored| {
            let tile = format!(" {} ", char::from(scored.letter));
            match scored.classification {
                LetterClassification::Correct => tile.black().on_green().bold().to_string(),
                LetterClassification::Present => tile.black().on_yellow().bold().to_string(),
                LetterClassification::Absent => tile.white().on_bright_black().to_string(),
            }
        })
        .collect()
}

/// One keyboard key, colored by what the board revealed
#[must_use]
pub fn colored_key(letter: char, state: KeyState) -> String {
    let key = letter.to_string();
    match state {
        KeyState::Correct => key.bright_green().bold().to_string(),
        KeyState::Present => key.bright_yellow().bold().to_string(),
        KeyState::Absent => key.bright_black().to_string(),
        KeyState::Unused => key.bright_white().to_string(),
    }
}

/// Player-facing explanation of a rejected submission
#[must_use]
pub fn rejection_message(rejection: &Rejection) -> String {
    match rejection {
        Rejection::NoActiveSession => "There is no game running in this group.".to_string(),
        Rejection::AlreadySubmittedThisRound => {
            "You've already submitted a word for this game.".to_string()
        }
        Rejection::UserOnCooldown { remaining } => format!(
            "You've already submitted recently in this group! Remaining: {}",
            format_remaining(*remaining)
        ),
        Rejection::InvalidLength(LengthError::TooShort | LengthError::TooLong) => {
            format!("Your submission must have {WORD_LENGTH} letters")
        }
        Rejection::NotAWord => "Your word is not in the dictionary.".to_string(),
    }
}

/// `HH:MM`, rounded down to the minute
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let minutes = remaining.as_secs() / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Progress bar style shared by long-running commands
#[must_use]
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}
