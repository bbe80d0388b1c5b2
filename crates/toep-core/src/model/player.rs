use crate::model::card::Card;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable index of a seat at the table. Seat order never changes during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(usize);

impl Seat {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{}", self.0 + 1)
    }
}

/// Per-seat state. Only the orchestrator mutates it.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    pub(crate) hand: Hand,
    pub(crate) pile: Vec<Card>,
    pub(crate) score: u32,
    pub(crate) pussy_points: u32,
    pub(crate) play_open: bool,
}

impl Player {
    pub fn new(seat: Seat) -> Self {
        Self {
            name: seat.to_string(),
            hand: Hand::new(),
            pile: Vec::new(),
            score: 0,
            pussy_points: 0,
            play_open: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Cards played this round, most recent last.
    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    pub fn last_played(&self) -> Option<Card> {
        self.pile.last().copied()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pussy_points(&self) -> u32 {
        self.pussy_points
    }

    pub fn play_open(&self) -> bool {
        self.play_open
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Hands back every card held or played so the deck can take them.
    pub(crate) fn reset_cards(&mut self) -> Vec<Card> {
        let mut cards = self.hand.take_all();
        cards.append(&mut self.pile);
        self.play_open = false;
        cards
    }

    pub(crate) fn reset_match(&mut self) {
        self.score = 0;
        self.pussy_points = 0;
        self.play_open = false;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Player {}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
