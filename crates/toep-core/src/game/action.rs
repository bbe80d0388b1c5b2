use crate::game::error::ActionError;
use crate::game::match_state::MatchState;
use crate::model::card::Card;
use crate::model::player::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The decision a seat is being asked to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    CallBluff,
    CheckOrTrust,
    GoOrFold,
    PlayCard,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionType::CallBluff => "call bluff",
            ActionType::CheckOrTrust => "check or trust",
            ActionType::GoOrFold => "go or fold",
            ActionType::PlayCard => "play card",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Toep,
    GoOn,
    Fold,
    CallVuileWas,
    PassVuileWas,
    Inspect,
    Trust,
    Play(Card),
}

impl Action {
    pub const fn action_type(self) -> ActionType {
        match self {
            Action::Toep | Action::Play(_) => ActionType::PlayCard,
            Action::GoOn | Action::Fold => ActionType::GoOrFold,
            Action::CallVuileWas | Action::PassVuileWas => ActionType::CallBluff,
            Action::Inspect | Action::Trust => ActionType::CheckOrTrust,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Toep => f.write_str("toep"),
            Action::GoOn => f.write_str("go on"),
            Action::Fold => f.write_str("fold"),
            Action::CallVuileWas => f.write_str("call vuile was"),
            Action::PassVuileWas => f.write_str("pass"),
            Action::Inspect => f.write_str("inspect"),
            Action::Trust => f.write_str("trust"),
            Action::Play(card) => write!(f, "play {card}"),
        }
    }
}

/// Who acts next and what they are deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub seat: Seat,
    pub action_type: ActionType,
}

impl Turn {
    pub const fn new(seat: Seat, action_type: ActionType) -> Self {
        Self { seat, action_type }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.seat, self.action_type)
    }
}

/// Seat verbs. Each one hands the decision to the orchestrator.
impl Seat {
    pub fn toep(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::Toep)
    }

    pub fn go_on(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::GoOn)
    }

    pub fn fold(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::Fold)
    }

    pub fn call_vuile_was(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::CallVuileWas)
    }

    pub fn pass_vuile_was(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::PassVuileWas)
    }

    pub fn inspect(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::Inspect)
    }

    pub fn trust(self, game: &mut MatchState) -> Result<Turn, ActionError> {
        game.apply(self, Action::Trust)
    }

    pub fn play_card(self, game: &mut MatchState, card: Card) -> Result<Turn, ActionError> {
        game.apply(self, Action::Play(card))
    }
}
