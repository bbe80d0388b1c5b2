use crate::model::DECK_SIZE;
use crate::model::card::Card;
use crate::model::player::Player;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("a deck must hold the 32 canonical cards exactly once, got {len} cards")]
    NotCanonical { len: usize },
}

/// The undealt stock. Cards are drawn from the end of the vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The canonical ordering: suit-major, jack up to ten within a suit.
    pub fn standard() -> Self {
        let cards = (0..DECK_SIZE).filter_map(Card::from_ordinal).collect();
        Self { cards }
    }

    /// A pre-arranged deck; the last card is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        let mut seen = [false; DECK_SIZE];
        for card in &cards {
            let slot = &mut seen[card.ordinal()];
            if *slot {
                return Err(DeckError::NotCanonical { len: cards.len() });
            }
            *slot = true;
        }
        if cards.len() != DECK_SIZE {
            return Err(DeckError::NotCanonical { len: cards.len() });
        }
        Ok(Self { cards })
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Puts cards back underneath the stock.
    pub fn replenish<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        let returned: Vec<Card> = cards.into_iter().collect();
        self.cards.splice(0..0, returned);
    }

    /// Deals `per_player` passes of one card to every seat, in seat order.
    pub fn distribute(&mut self, players: &mut [Player], per_player: usize) {
        for _ in 0..per_player {
            for player in players.iter_mut() {
                let card = self
                    .draw()
                    .expect("deal never asks for more cards than the deck holds");
                player.hand.add(card);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}
