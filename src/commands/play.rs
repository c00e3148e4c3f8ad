//! Line-oriented shared-board mode
//!
//! Several players, named on each line, share boards grouped by name.

use crate::game::{GroupId, SessionOrchestrator, UserId};
use crate::output::{
    print_board, print_keyboard, print_lookup, print_recent_games, print_restart, print_revealed,
    print_submission, print_user_stats,
};
use crate::output::formatters::format_remaining;
use crate::storage::Repository;
use anyhow::Result;
use std::io::{self, BufRead, Write};

const DEFAULT_GROUP: &str = "main";

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Submit {
        group: GroupId,
        user: UserId,
        word: String,
    },
    Start(Option<GroupId>),
    Board(Option<GroupId>),
    Keyboard(Option<GroupId>),
    Recent(Option<GroupId>),
    Reveal(Option<GroupId>),
    Stats(UserId),
    Cooldown {
        group: GroupId,
        user: UserId,
    },
    Lookup(String),
    Reset,
    Rebuild,
    Help,
    Quit,
}

/// Parse one input line
///
/// # Errors
///
/// Returns a usage message if the command is unknown or has the wrong arguments.
pub fn parse_command(line: &str) -> Result<PlayCommand, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return Err("Empty command. Type 'help' for a list.".to_string());
    };
    let group_arg = || args.first().map(|&g| GroupId::new(g));

    let command = match (name.to_lowercase().as_str(), args.len()) {
        ("submit" | "s", 3) => PlayCommand::Submit {
            group: args[0].into(),
            user: args[1].into(),
            word: args[2].to_string(),
        },
        ("submit" | "s", _) => return Err("Usage: submit <group> <user> <word>".to_string()),
        ("start", 0 | 1) => PlayCommand::Start(group_arg()),
        ("board" | "b", 0 | 1) => PlayCommand::Board(group_arg()),
        ("keyboard" | "k", 0 | 1) => PlayCommand::Keyboard(group_arg()),
        ("recent", 0 | 1) => PlayCommand::Recent(group_arg()),
        ("reveal", 0 | 1) => PlayCommand::Reveal(group_arg()),
        ("stats", 1) => PlayCommand::Stats(args[0].into()),
        ("stats", _) => return Err("Usage: stats <user>".to_string()),
        ("cooldown", 2) => PlayCommand::Cooldown {
            group: args[0].into(),
            user: args[1].into(),
        },
        ("cooldown", _) => return Err("Usage: cooldown <group> <user>".to_string()),
        ("lookup" | "poll", 1) => PlayCommand::Lookup(args[0].to_string()),
        ("lookup" | "poll", _) => return Err("Usage: lookup <word>".to_string()),
        ("reset", 0) => PlayCommand::Reset,
        ("rebuild", 0) => PlayCommand::Rebuild,
        ("help" | "h" | "?", _) => PlayCommand::Help,
        ("quit" | "q" | "exit", _) => PlayCommand::Quit,
        (other, _) => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    };
    Ok(command)
}

/// Run the interactive loop until `quit` or end of input
///
/// The local operator is treated as an administrator.
///
/// # Errors
///
/// Returns an error on I/O failure or if the game reports a storage failure.
pub fn run_play<R: Repository>(game: &SessionOrchestrator<R>) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Shared Wordle - Group Mode                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    print_help();

    let stdin = io::stdin();
    let mut current = GroupId::new(DEFAULT_GROUP);
    let mut lines = stdin.lock().lines();

    loop {
        print!("[{current}] > ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        match command {
            PlayCommand::Quit => break,
            PlayCommand::Help => print_help(),
            PlayCommand::Submit { group, user, word } => {
                let outcome = game.submit(&group, &user, &word)?;
                print_submission(&outcome);
                current = group;
            }
            PlayCommand::Start(group) => {
                let group = group.unwrap_or_else(|| current.clone());
                let id = game.start_session(&group)?;
                println!("Session {id} is running in {group}");
                current = group;
            }
            PlayCommand::Board(group) => {
                let group = group.unwrap_or_else(|| current.clone());
                let board = game.current_board(&group)?;
                print_board(&group, &board, game.settings().max_guesses);
            }
            PlayCommand::Keyboard(group) => {
                print_keyboard(&game.keyboard(group.as_ref().unwrap_or(&current))?);
            }
            PlayCommand::Recent(group) => {
                print_recent_games(&game.recent_games(group.as_ref().unwrap_or(&current))?);
            }
            PlayCommand::Reveal(group) => {
                print_revealed(game.reveal_answer(group.as_ref().unwrap_or(&current))?.as_ref());
            }
            PlayCommand::Stats(user) => {
                print_user_stats(&game.user_stats(&user)?, game.settings().par);
            }
            PlayCommand::Cooldown { group, user } => {
                let remaining = game.remaining_cooldown(&group, &user)?;
                if remaining.is_zero() {
                    println!("{user} may submit in {group} now");
                } else {
                    println!("{user} may submit in {group} in {}", format_remaining(remaining));
                }
            }
            PlayCommand::Lookup(word) => match game.lookup_word(&word) {
                Ok(lookup) => print_lookup(&lookup),
                Err(e) => println!("{e}"),
            },
            PlayCommand::Reset => print_restart(&game.restart(true, false)?),
            PlayCommand::Rebuild => print_restart(&game.restart(true, true)?),
        }
    }

    println!("\n👋 Thanks for playing!\n");
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  submit <group> <user> <word>   guess for a group");
    println!("  start [group]                  open a session if none is running");
    println!("  board [group]                  show the shared board");
    println!("  keyboard [group]               letters revealed so far");
    println!("  recent [group]                 recently finished games");
    println!("  reveal [group]                 answer of a finished game");
    println!("  stats <user>                   lifetime statistics");
    println!("  cooldown <group> <user>        time until the user may guess again");
    println!("  lookup <word>                  word list and dictionary membership");
    println!("  reset                          close every running game");
    println!("  rebuild                        recompute statistics from history");
    println!("  quit\n");
}
