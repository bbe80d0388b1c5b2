use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::CARDS_PER_PLAYER;

/// Cards held by one seat, in the order they were dealt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(CARDS_PER_PLAYER),
        }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    /// A "vuile was": a full hand of court cards and aces with at most one seven.
    pub fn is_vuile_was(&self) -> bool {
        if self.cards.len() < CARDS_PER_PLAYER {
            return false;
        }
        let sevens = self.cards.iter().filter(|c| c.rank == Rank::Seven).count();
        self.cards.iter().all(|c| c.value() <= Rank::Seven.value()) && sevens <= 1
    }

    /// Cards that follow `leading_suit`, or the whole hand when none do.
    pub fn legal_cards(&self, leading_suit: Option<Suit>) -> Vec<Card> {
        match leading_suit {
            Some(suit) if self.has_suit(suit) => self
                .cards
                .iter()
                .copied()
                .filter(|c| c.suit == suit)
                .collect(),
            _ => self.cards.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn hand_of(ranks: [Rank; 4]) -> Hand {
        let suits = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];
        Hand::with_cards(
            ranks
                .iter()
                .zip(suits.iter())
                .map(|(&rank, &suit)| Card::new(rank, suit))
                .collect(),
        )
    }

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Nine, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_keep_dealt_order() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::Jack, Suit::Clubs));
        assert_eq!(hand.cards()[0], Card::new(Rank::King, Suit::Spades));
        assert_eq!(hand.cards()[1], Card::new(Rank::Jack, Suit::Clubs));
    }

    #[test]
    fn court_cards_qualify_as_vuile_was() {
        assert!(hand_of([Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]).is_vuile_was());
        assert!(hand_of([Rank::Seven, Rank::Jack, Rank::Queen, Rank::King]).is_vuile_was());
    }

    #[test]
    fn two_sevens_or_an_eight_do_not_qualify() {
        assert!(!hand_of([Rank::Seven, Rank::Seven, Rank::Jack, Rank::Queen]).is_vuile_was());
        assert!(!hand_of([Rank::Eight, Rank::Jack, Rank::Queen, Rank::King]).is_vuile_was());
    }

    #[test]
    fn partial_hand_never_qualifies() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Hearts),
            Card::new(Rank::Queen, Suit::Hearts),
        ]);
        assert!(!hand.is_vuile_was());
    }

    #[test]
    fn legal_cards_follow_leading_suit_when_possible() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Hearts),
            Card::new(Rank::Ten, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Hearts),
        ]);
        assert_eq!(
            hand.legal_cards(Some(Suit::Hearts)),
            vec![
                Card::new(Rank::Jack, Suit::Hearts),
                Card::new(Rank::Ace, Suit::Hearts)
            ]
        );
        assert_eq!(hand.legal_cards(Some(Suit::Spades)).len(), 3);
        assert_eq!(hand.legal_cards(None).len(), 3);
    }
}
