pub mod action;
pub mod error;
pub mod match_state;
pub mod serialization;
pub mod turn_order;

pub use action::{Action, ActionType, Turn};
pub use error::{ActionError, GameError};
pub use match_state::{MAX_PLAYERS, MAX_SCORE, MIN_PLAYERS, MatchResult, MatchState};
