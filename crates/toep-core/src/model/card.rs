use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.rank, Rank::Jack)
    }

    /// Position in the canonical 32-card ordering (suit-major).
    pub const fn ordinal(self) -> usize {
        self.suit.index() * Rank::ORDERED.len() + (self.rank.value() as usize - 3)
    }

    /// Inverse of [`ordinal`](Self::ordinal); `None` past the last card.
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        let per_suit = Rank::ORDERED.len();
        let Some(suit) = Suit::from_index(ordinal / per_suit) else {
            return None;
        };
        let Some(rank) = Rank::from_value((ordinal % per_suit) as u8 + 3) else {
            return None;
        };
        Some(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse card from {input:?}")]
pub struct CardParseError {
    pub input: String,
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || CardParseError {
            input: s.to_string(),
        };
        let suit_symbol = trimmed.chars().last().ok_or_else(err)?;
        let suit = Suit::from_symbol(suit_symbol).ok_or_else(err)?;
        let rank_label = &trimmed[..trimmed.len() - suit_symbol.len_utf8()];
        let rank = Rank::from_label(rank_label).ok_or_else(err)?;
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn value_follows_rank_table() {
        assert_eq!(Card::new(Rank::Jack, Suit::Spades).value(), 3);
        assert_eq!(Card::new(Rank::Seven, Suit::Hearts).value(), 7);
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).value(), 10);
    }

    #[test]
    fn equality_is_suit_and_rank() {
        assert_eq!(
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Hearts)
        );
        assert_ne!(
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Clubs)
        );
    }

    #[test]
    fn display_and_parse_agree() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        assert_eq!(card.to_string(), "10D");
        assert_eq!("10D".parse::<Card>().unwrap(), card);
        assert_eq!("qs".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Spades));
        assert!("2H".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn ordinals_cover_the_deck_once() {
        let mut seen = [false; 32];
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let ordinal = Card::new(rank, suit).ordinal();
                assert!(!seen[ordinal]);
                seen[ordinal] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn from_ordinal_inverts_ordinal() {
        for ordinal in 0..32 {
            let card = Card::from_ordinal(ordinal).expect("ordinal inside the deck");
            assert_eq!(card.ordinal(), ordinal);
        }
        assert_eq!(Card::from_ordinal(0), Some(Card::new(Rank::Jack, Suit::Hearts)));
        assert_eq!(Card::from_ordinal(31), Some(Card::new(Rank::Ten, Suit::Clubs)));
        assert_eq!(Card::from_ordinal(32), None);
    }
}
