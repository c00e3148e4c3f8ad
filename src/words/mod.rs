//! Word sources for targets and the dictionary for submissions
//!
//! `WordSource` picks session targets, `Dictionary` decides which submissions are real words.
//! Both come with embedded lists compiled into the binary.

pub mod loader;

// Generated by build.rs from data/
include!(concat!(env!("OUT_DIR"), "/answers.rs"));
include!(concat!(env!("OUT_DIR"), "/dictionary.rs"));

use crate::core::Word;
use rand::prelude::IndexedRandom;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supplies target words for new sessions
pub trait WordSource: Send + Sync {
    /// Pick a target uniformly from the vocabulary
    fn random_word(&self) -> Word;

    /// Whether the word could ever be drawn as a target
    fn contains(&self, word: &Word) -> bool;
}

/// Membership test for submitted words
pub trait Dictionary: Send + Sync {
    fn is_valid_word(&self, word: &Word) -> bool;

    /// Human-readable definition, if one is known
    fn definition(&self, _word: &Word) -> Option<&str> {
        None
    }
}

/// Errors raised while loading word lists at startup
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list {0} contains no usable words")]
    Empty(String),
}

/// Fixed vocabulary of possible targets
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<Word>,
    index: FxHashSet<Word>,
}

impl WordList {
    /// # Errors
    /// Returns `WordListError::Empty` if `words` is empty.
    pub fn new(words: Vec<Word>, name: &str) -> Result<Self, WordListError> {
        if words.is_empty() {
            return Err(WordListError::Empty(name.to_string()));
        }
        let index = words.iter().cloned().collect();
        Ok(Self { words, index })
    }

    /// The target list compiled into the binary
    ///
    /// # Errors
    /// Returns `WordListError::Empty` if the embedded list has no valid words.
    pub fn embedded() -> Result<Self, WordListError> {
        Self::new(loader::words_from_slice(ANSWERS), "embedded answers")
    }

    /// # Errors
    /// Returns an error if the file cannot be read or has no valid words.
    pub fn from_file(path: &Path) -> Result<Self, WordListError> {
        Self::new(loader::load_from_file(path)?, &path.display().to_string())
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordList {
    fn random_word(&self) -> Word {
        // `new` guarantees at least one word
        self.words
            .choose(&mut rand::rng())
            .unwrap_or(&self.words[0])
            .clone()
    }

    fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }
}

/// Dictionary of submittable words with optional definitions
#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    entries: FxHashMap<Word, String>,
}

impl WordDictionary {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (Word, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Build a dictionary without definitions
    #[must_use]
    pub fn from_words(words: impl IntoIterator<Item = Word>) -> Self {
        Self::new(words.into_iter().map(|w| (w, String::new())))
    }

    /// The dictionary compiled into the binary
    ///
    /// # Errors
    /// Returns `WordListError::Empty` if the embedded dictionary has no valid words.
    pub fn embedded() -> Result<Self, WordListError> {
        let dictionary = Self::new(loader::entries_from_slice(DICTIONARY));
        if dictionary.is_empty() {
            return Err(WordListError::Empty("embedded dictionary".to_string()));
        }
        Ok(dictionary)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or has no valid words.
    pub fn from_file(path: &Path) -> Result<Self, WordListError> {
        let dictionary = Self::new(loader::load_dictionary_file(path)?);
        if dictionary.is_empty() {
            return Err(WordListError::Empty(path.display().to_string()));
        }
        Ok(dictionary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dictionary for WordDictionary {
    fn is_valid_word(&self, word: &Word) -> bool {
        self.entries.contains_key(word)
    }

    fn definition(&self, word: &Word) -> Option<&str> {
        self.entries
            .get(word)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}
