//! Command implementations

pub mod play;
pub mod score;
pub mod simulate;

pub use play::{PlayCommand, parse_command, run_play};
pub use score::score_words;
pub use simulate::{SimulationConfig, SimulationReport, board_candidates, run_simulation};
