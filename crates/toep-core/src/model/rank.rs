use core::fmt;
use serde::{Deserialize, Serialize};

/// Ranks in trick order. The court cards sit below the seven, so the
/// discriminant doubles as the comparison value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Jack = 3,
    Queen = 4,
    King = 5,
    Ace = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
}

impl Rank {
    pub const ORDERED: [Rank; 8] = [
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            3 => Some(Rank::Jack),
            4 => Some(Rank::Queen),
            5 => Some(Rank::King),
            6 => Some(Rank::Ace),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Rank::ORDERED
            .iter()
            .copied()
            .find(|rank| rank.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
