//! Simulate command
//!
//! Plays many groups concurrently with players who only guess words consistent
//! with the shared board, then checks that rebuilding statistics is stable.

use crate::core::{ScoredGuess, Word};
use crate::game::{
    GameError, GroupId, RebuildReport, SessionOrchestrator, SubmissionOutcome, UserId,
};
use crate::output::formatters::progress_style;
use crate::storage::Repository;
use indicatif::ProgressBar;
use rand::prelude::IndexedRandom;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::info;

/// Shape of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub groups: usize,
    /// Sessions played back to back in each group
    pub rounds: usize,
    pub show_progress: bool,
}

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub sessions: usize,
    pub won: usize,
    pub lost: usize,
    pub guesses: usize,
    pub rejections: usize,
    /// Guesses needed, for won sessions only
    pub distribution: BTreeMap<usize, usize>,
    pub duration: Duration,
    pub rebuilds: [RebuildReport; 2],
    /// Neither rebuild had anything to correct
    pub stable: bool,
}

#[derive(Debug, Default)]
struct SessionResult {
    won: bool,
    guesses: usize,
    rejections: usize,
}

/// Words from `pool` that would have produced every guess on `board`
#[must_use]
pub fn board_candidates<'a>(pool: &'a [Word], board: &[ScoredGuess]) -> Vec<&'a Word> {
    pool.iter()
        .filter(|&candidate| {
            board.iter().all(|observed| {
                ScoredGuess::calculate(observed.word(), candidate)
                    .is_ok_and(|s| s.classifications() == observed.classifications())
            })
        })
        .collect()
}

/// Run the simulation against `game`
///
/// Players are unique per group and round, so cooldowns never block them.
///
/// # Errors
///
/// Returns the first `GameError` raised by any group.
pub fn run_simulation<R: Repository>(
    game: &SessionOrchestrator<R>,
    pool: &[Word],
    config: SimulationConfig,
) -> Result<SimulationReport, GameError> {
    let start = Instant::now();
    let total = config.groups * config.rounds;
    let pb = if config.show_progress {
        ProgressBar::new(total as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(progress_style());
    pb.set_message("playing");

    let results = (0..config.groups)
        .into_par_iter()
        .map(|g| {
            let group = GroupId::new(format!("group-{g}"));
            let mut played = Vec::with_capacity(config.rounds);
            for round in 0..config.rounds {
                played.push(play_session(game, pool, &group, round)?);
                pb.inc(1);
            }
            Ok::<_, GameError>(played)
        })
        .collect::<Result<Vec<_>, GameError>>()?;
    pb.finish_with_message("rebuilding statistics");

    let mut report = SimulationReport {
        sessions: 0,
        won: 0,
        lost: 0,
        guesses: 0,
        rejections: 0,
        distribution: BTreeMap::new(),
        duration: Duration::ZERO,
        rebuilds: [RebuildReport::default(); 2],
        stable: false,
    };
    for result in results.iter().flatten() {
        report.sessions += 1;
        report.guesses += result.guesses;
        report.rejections += result.rejections;
        if result.won {
            report.won += 1;
            *report.distribution.entry(result.guesses).or_insert(0) += 1;
        } else {
            report.lost += 1;
        }
    }

    let first = game.rebuild_statistics()?;
    let second = game.rebuild_statistics()?;
    report.stable = first.corrected == 0 && second.corrected == 0;
    report.rebuilds = [first, second];
    report.duration = start.elapsed();

    info!(
        sessions = report.sessions,
        won = report.won,
        lost = report.lost,
        stable = report.stable,
        "simulation finished"
    );
    Ok(report)
}

fn play_session<R: Repository>(
    game: &SessionOrchestrator<R>,
    pool: &[Word],
    group: &GroupId,
    round: usize,
) -> Result<SessionResult, GameError> {
    game.start_session(group)?;
    let mut result = SessionResult::default();
    let mut rng = rand::rng();

    for player in 0..game.settings().max_guesses {
        let board = game.current_board(group)?;
        let candidates = board_candidates(pool, &board);
        let word = match candidates.choose(&mut rng) {
            Some(&word) => word,
            None => match pool.choose(&mut rng) {
                Some(word) => word,
                None => break,
            },
        };

        let user = UserId::new(format!("{group}-r{round}-p{player}"));
        match game.submit(group, &user, word.text())? {
            SubmissionOutcome::Accepted(_) => result.guesses += 1,
            SubmissionOutcome::Won(receipt) => {
                result.won = true;
                result.guesses = receipt.guesses_used;
                break;
            }
            SubmissionOutcome::Lost(receipt) => {
                result.guesses = receipt.guesses_used;
                break;
            }
            SubmissionOutcome::Rejected(_) => result.rejections += 1,
        }
    }

    Ok(result)
}
