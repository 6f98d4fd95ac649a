//! Cards, ranks and suits

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RANK
// ============================================================================

/// Card rank. Aces are low in Gin Rummy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Rank {
    /// All ranks in ascending order
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Position in a run (Ace = 1 ... King = 13)
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Deadwood points: face value, court cards count ten
    pub fn value(self) -> u32 {
        u32::from(self.ordinal()).min(10)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        };
        f.write_str(s)
    }
}

// ============================================================================
// SUIT
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suit::Club => "c",
            Suit::Diamond => "d",
            Suit::Heart => "h",
            Suit::Spade => "s",
        };
        f.write_str(s)
    }
}

// ============================================================================
// CARD
// ============================================================================

/// A playing card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Deadwood points carried by this card
    pub fn value(&self) -> u32 {
        self.rank.value()
    }

    /// Observation encoding in `1..=52`. Zero is reserved for an empty slot.
    pub fn ranking(&self) -> u8 {
        (self.suit as u8) * 13 + self.rank.ordinal()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Unrecognised card notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid card notation: {0:?}")]
pub struct ParseCardError(pub String);

/// Parses the two-character notation used by `Display`, e.g. `"Ts"` or `"4d"`
impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError(s.to_string()));
        };
        let rank = Rank::ALL
            .into_iter()
            .find(|rank| rank.to_string() == r.to_ascii_uppercase().to_string());
        let suit = Suit::ALL
            .into_iter()
            .find(|suit| suit.to_string() == u.to_ascii_lowercase().to_string());
        match (rank, suit) {
            (Some(rank), Some(suit)) => Ok(Card::new(rank, suit)),
            _ => Err(ParseCardError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rank_values() {
        assert_eq!(Rank::Ace.value(), 1);
        assert_eq!(Rank::Seven.value(), 7);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::Jack.value(), 10);
        assert_eq!(Rank::King.value(), 10);
    }

    #[test]
    fn test_rankings_are_unique_and_nonzero() {
        let mut seen = HashSet::new();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let r = Card::new(rank, suit).ranking();
                assert!((1..=52).contains(&r));
                assert!(seen.insert(r), "duplicate ranking {}", r);
            }
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(Rank::Ten, Suit::Spade).to_string(), "Ts");
        assert_eq!(Card::new(Rank::Ace, Suit::Heart).to_string(), "Ah");
    }

    #[test]
    fn test_parse_matches_display() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let card = Card::new(rank, suit);
                assert_eq!(card.to_string().parse::<Card>(), Ok(card));
            }
        }
        assert_eq!("qS".parse::<Card>(), Ok(Card::new(Rank::Queen, Suit::Spade)));
        assert!("10h".parse::<Card>().is_err());
        assert!("Zx".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }
}
