//! Game rules and coordination
//!
//! Sessions, submission policy, novelty attribution and per-user statistics,
//! tied together by [`SessionOrchestrator`].

mod clock;
mod ids;
mod keyboard;
mod novelty;
mod orchestrator;
mod policy;
mod session;
mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{GroupId, SessionId, UserId};
pub use keyboard::{KEYBOARD_ROWS, KeyState, Keyboard};
pub use novelty::{NoveltyCount, attribute, replay};
pub use orchestrator::{
    CompletedGame, GameError, RebuildReport, Receipt, RestartOutcome, RevealedAnswer,
    SessionOrchestrator, Settings, SubmissionOutcome, WordLookup,
};
pub use policy::{DEFAULT_COOLDOWN_HOURS, LengthError, Rejection, SubmissionPolicy};
pub use session::{DEFAULT_MAX_GUESSES, GameSession, Guess, SessionError, SessionStatus};
pub use stats::{DEFAULT_PAR, UserStats};
