//! Display functions for command results

use super::formatters::{colored_guess, colored_key, rejection_message};
use crate::commands::SimulationReport;
use crate::core::ScoredGuess;
use crate::game::{
    CompletedGame, GroupId, KEYBOARD_ROWS, Keyboard, RestartOutcome, RevealedAnswer,
    SessionStatus, SubmissionOutcome, UserStats, WordLookup,
};
use colored::Colorize;

/// Print the shared board of a group
pub fn print_board(group: &GroupId, board: &[ScoredGuess], max_guesses: usize) {
    println!("\n{}", "─".repeat(40).cyan());
    println!(
        "Board for {} ({}/{max_guesses})",
        group.as_str().bright_yellow().bold(),
        board.len()
    );
    println!("{}", "─".repeat(40).cyan());

    if board.is_empty() {
        println!("  No guesses yet.");
    }
    for (i, guess) in board.iter().enumerate() {
        println!(
            "  {}. {}  {}",
            (i + 1).to_string().bright_black(),
            colored_guess(guess),
            guess.to_emoji()
        );
    }
    println!();
}

/// Print the outcome of a submission
pub fn print_submission(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Accepted(receipt) => {
            println!(
                "{} {} ({}/{})",
                "✓".green().bold(),
                colored_guess(&receipt.scored),
                receipt.guesses_used,
                receipt.max_guesses
            );
            print_novelty(receipt.novelty.new_correct, receipt.novelty.new_present);
        }
        SubmissionOutcome::Won(receipt) => {
            println!("{}", colored_guess(&receipt.scored));
            println!(
                "{}",
                format!("🎉 Solved in {} guesses!", receipt.guesses_used)
                    .green()
                    .bold()
            );
            print_novelty(receipt.novelty.new_correct, receipt.novelty.new_present);
        }
        SubmissionOutcome::Lost(receipt) => {
            println!("{}", colored_guess(&receipt.scored));
            let answer = receipt
                .answer
                .as_ref()
                .map_or_else(String::new, |w| format!(" The answer was {w}."));
            println!(
                "{}",
                format!("❌ Out of guesses.{answer}").red().bold()
            );
        }
        SubmissionOutcome::Rejected(rejection) => {
            println!("{}", rejection_message(rejection).yellow());
        }
    }
}

fn print_novelty(new_correct: u8, new_present: u8) {
    if new_correct + new_present > 0 {
        println!("  {new_correct} new greens, {new_present} new yellows");
    }
}

/// Print the keyboard summary, one QWERTY row per line
pub fn print_keyboard(keyboard: &Keyboard) {
    println!();
    for (indent, row) in KEYBOARD_ROWS.iter().enumerate() {
        let keys: Vec<String> = row
            .bytes()
            .map(|letter| colored_key(char::from(letter), keyboard.state(letter)))
            .collect();
        println!("{}{}", " ".repeat(indent), keys.join(" "));
    }
    println!();
}

/// Print a user's lifetime statistics
pub fn print_user_stats(stats: &UserStats, par: i64) {
    println!("\nStatistics for user {}", stats.user.as_str().bright_cyan().bold());
    println!("  {} new yellows guessed", stats.new_present);
    println!("  {} new greens guessed", stats.new_correct);
    println!("  {} away from par ({par})", stats.par_score);
    if let Some((word, count)) = &stats.top_word {
        println!("  Guessed {word} {count} times");
    }
    println!(
        "  {}/{} games won ({:.2}%).",
        stats.games_won,
        stats.games_won + stats.games_lost,
        stats.win_percent()
    );
    if stats.games_played > stats.games_won + stats.games_lost {
        println!(
            "  {} games unfinished",
            stats.games_played - stats.games_won - stats.games_lost
        );
    }
    println!();
}

/// Print the recent finished games of a group
pub fn print_recent_games(games: &[CompletedGame]) {
    println!("\nRecent games:");
    if games.is_empty() {
        println!("  No recent games found!");
    }
    for game in games {
        let status = match game.status {
            SessionStatus::Won => "won".green(),
            SessionStatus::Lost => "lost".red(),
            SessionStatus::Incomplete => "incomplete".bright_black(),
            SessionStatus::Active => "active".normal(),
        };
        let ending = game
            .final_guess
            .as_ref()
            .map_or_else(String::new, |w| format!(" ending with {w}"));
        println!(
            "  {} {} guesses{ending}, answer was {} ({status})",
            game.session_id,
            game.guesses_used,
            game.answer.to_string().bold()
        );
    }
    println!();
}

/// Print a revealed answer and its definition, if any
pub fn print_revealed(revealed: Option<&RevealedAnswer>) {
    match revealed {
        Some(answer) => {
            println!("The answer was {}", answer.word.to_string().bright_yellow().bold());
            if let Some(definition) = &answer.definition {
                for line in definition.lines() {
                    println!("  {line}");
                }
            }
        }
        None => println!("The current game is still running."),
    }
}

/// Print where a word stands with respect to the word list and dictionary
pub fn print_lookup(lookup: &WordLookup) {
    let status = match (lookup.possible_target, lookup.submittable) {
        (true, true) => "is in the dictionary and the word list",
        (false, true) => "can be submitted but will never be chosen as the solution",
        (true, false) => "may be chosen as the solution but cannot be submitted",
        (false, false) => "can neither be submitted nor chosen as the solution",
    };
    println!("{} {status}", lookup.word.to_string().bold());
}

/// Print the result of an administrative restart
pub fn print_restart(outcome: &RestartOutcome) {
    match outcome {
        RestartOutcome::Unauthorized => println!("{}", "Unauthorized to perform this action".red()),
        RestartOutcome::SessionsReset(count) => println!("Games reset ({count} closed)"),
        RestartOutcome::StatisticsRebuilt(report) => println!(
            "Database stats rebuilt: {} sessions, {} moves, {} corrected",
            report.sessions, report.moves, report.corrected
        ),
    }
}

/// Print the summary of a simulation run
pub fn print_simulation_report(report: &SimulationReport) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {}", "SIMULATION RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("  Sessions:      {}", report.sessions);
    println!(
        "  Won / lost:    {} / {}",
        report.won.to_string().green(),
        report.lost.to_string().red()
    );
    println!("  Guesses:       {}", report.guesses);
    println!("  Rejections:    {}", report.rejections);
    println!("  Duration:      {:.2?}", report.duration);

    println!("\n  Guess distribution (won sessions):");
    let widest = report.distribution.values().copied().max().unwrap_or(1).max(1);
    for (guesses, count) in &report.distribution {
        let width = count * 40 / widest;
        println!("    {guesses}: {} {count}", "█".repeat(width).bright_blue());
    }

    let verdict = if report.stable {
        "stable".green().bold()
    } else {
        "UNSTABLE".red().bold()
    };
    println!(
        "\n  Rebuild: {} then {} corrections ({verdict})",
        report.rebuilds[0].corrected, report.rebuilds[1].corrected
    );
    println!();
}
