//! Terminal output formatting
//!
//! Display utilities for the CLI host.

pub mod display;
pub mod formatters;

pub use display::{
    print_board, print_keyboard, print_lookup, print_recent_games, print_restart, print_revealed,
    print_simulation_report, print_submission, print_user_stats,
};
pub use formatters::rejection_message;
