pub mod card;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rank;
pub mod suit;

pub const CARDS_PER_PLAYER: usize = 4;
pub const DECK_SIZE: usize = 32;
