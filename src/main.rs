//! Shared Wordle - CLI
//!
//! Collaborative Wordle for groups of players, with a line-oriented play mode,
//! one-off scoring and a concurrent simulation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared_wordle::{
    commands::{SimulationConfig, run_play, run_simulation, score_words},
    config::GameConfig,
    game::{SessionOrchestrator, SystemClock},
    output::print_simulation_report,
    storage::MemoryRepository,
    words::{WordDictionary, WordList},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "shared_wordle",
    about = "Collaborative Wordle: one board per group, one guess per player",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (default: ./shared_wordle.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play shared boards from the terminal (default)
    Play,

    /// Score a guess against a target
    Score {
        guess: String,
        target: String,
    },

    /// Play many groups concurrently and check statistics rebuilds
    Simulate {
        /// Number of groups
        #[arg(short, long, default_value = "16")]
        groups: usize,

        /// Sessions per group
        #[arg(short, long, default_value = "10")]
        rounds: usize,
    },
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shared_wordle={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn build_game(config: &GameConfig) -> Result<SessionOrchestrator<MemoryRepository>> {
    let words = match &config.word_list {
        Some(path) => WordList::from_file(path),
        None => WordList::embedded(),
    }
    .context("failed to load the word list")?;

    let dictionary = match &config.dictionary {
        Some(path) => WordDictionary::from_file(path),
        None => WordDictionary::embedded(),
    }
    .context("failed to load the dictionary")?;

    info!(
        words = words.len(),
        dictionary = dictionary.len(),
        "loaded vocabularies"
    );

    Ok(SessionOrchestrator::new(
        MemoryRepository::new(),
        Box::new(words),
        Box::new(dictionary),
        Arc::new(SystemClock),
        config.settings(),
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let game = build_game(&config)?;
            run_play(&game)
        }
        Commands::Score { guess, target } => {
            let scored = score_words(&guess, &target)?;
            println!("{scored}");
            Ok(())
        }
        Commands::Simulate { groups, rounds } => {
            let game = build_game(&config)?;
            let pool = match &config.word_list {
                Some(path) => WordList::from_file(path)?,
                None => WordList::embedded()?,
            };
            let report = run_simulation(
                &game,
                pool.words(),
                SimulationConfig {
                    groups,
                    rounds,
                    show_progress: true,
                },
            )?;
            print_simulation_report(&report);
            Ok(())
        }
    }
}
