use crate::game::action::ActionType;
use crate::model::card::Card;
use crate::model::player::Seat;
use thiserror::Error;

/// Construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("a game needs at least {min} players, got {requested}")]
    TooFewPlayers { requested: usize, min: usize },
    #[error("a game supports at most {max} players, got {requested}")]
    TooManyPlayers { requested: usize, max: usize },
}

/// A verb that does not fit the current turn. Nothing is mutated when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no round is in progress; call start_round first")]
    NoRoundInProgress,
    #[error("expected {expected} to act but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("waiting for {expected:?} but got a {actual:?} action")]
    WrongPhase {
        expected: ActionType,
        actual: ActionType,
    },
    #[error("{seat} does not hold {card}")]
    CardNotInHand { seat: Seat, card: Card },
    #[error("{seat} may not toep now")]
    ToepNotAllowed { seat: Seat },
}
