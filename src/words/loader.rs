//! Word list loading utilities
//!
//! Provides functions to load word lists from files or use embedded constants.
//! Blank lines and entries that are not valid five-letter words are skipped.

use super::WordListError;
use crate::core::{WORD_LENGTH, Word};
use std::fs;
use std::path::Path;

fn parse_word(text: &str) -> Option<Word> {
    Word::new(text)
        .ok()
        .filter(|word| word.len() == WORD_LENGTH)
}

/// Load words from a file, one per line
///
/// # Errors
///
/// Returns `WordListError::Io` if the file cannot be read.
///
/// # Examples
/// ```no_run
/// use shared_wordle::words::loader::load_from_file;
///
/// let words = load_from_file("data/answers.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, WordListError> {
    let content = read(path.as_ref())?;

    Ok(content.lines().filter_map(|line| parse_word(line.trim())).collect())
}

/// Load dictionary entries from a file
///
/// Each line is `word` or `word definition`; a literal `\n` in a definition
/// becomes a line break.
///
/// # Errors
///
/// Returns `WordListError::Io` if the file cannot be read.
pub fn load_dictionary_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<(Word, String)>, WordListError> {
    let content = read(path.as_ref())?;

    Ok(content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (word, definition) = line.split_once(' ').unwrap_or((line, ""));
            parse_word(word).map(|w| (w, definition.trim().replace("\\n", "\n")))
        })
        .collect())
}

/// Convert embedded string slice to Word vector
///
/// # Examples
/// ```
/// use shared_wordle::words::loader::words_from_slice;
/// use shared_wordle::words::ANSWERS;
///
/// let words = words_from_slice(ANSWERS);
/// assert_eq!(words.len(), ANSWERS.len());
/// ```
#[must_use]
pub fn words_from_slice(slice: &[&str]) -> Vec<Word> {
    slice.iter().filter_map(|&s| parse_word(s)).collect()
}

/// Convert embedded dictionary entries
#[must_use]
pub fn entries_from_slice(slice: &[(&str, &str)]) -> Vec<(Word, String)> {
    slice
        .iter()
        .filter_map(|&(word, definition)| parse_word(word).map(|w| (w, definition.to_string())))
        .collect()
}

fn read(path: &Path) -> Result<String, WordListError> {
    fs::read_to_string(path).map_err(|source| WordListError::Io {
        path: path.to_path_buf(),
        source,
    })
}
