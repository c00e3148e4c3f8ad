//! Shared Wordle
//!
//! One hidden word per group, guessed collaboratively: each player may submit one
//! word per session and must then wait out a cooldown before guessing again in
//! that group. Players are credited for the letters they reveal first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shared_wordle::game::{SessionOrchestrator, Settings, SystemClock};
//! use shared_wordle::storage::MemoryRepository;
//! use shared_wordle::words::{WordDictionary, WordList};
//!
//! let game = SessionOrchestrator::new(
//!     MemoryRepository::new(),
//!     Box::new(WordList::embedded().unwrap()),
//!     Box::new(WordDictionary::embedded().unwrap()),
//!     Arc::new(SystemClock),
//!     Settings::default(),
//! );
//!
//! let outcome = game.submit(&"guild".into(), &"alice".into(), "crane").unwrap();
//! println!("{outcome:?}");
//! ```

// Core domain types
pub mod core;

// Sessions, rules and the orchestrator
pub mod game;

// Persistence
pub mod storage;

// Word lists and dictionary
pub mod words;

// Layered configuration
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
