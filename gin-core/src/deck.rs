//! Deck and discard pile

use crate::card::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;

/// Undealt cards. The top of the deck is the end of the vector.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 52-card deck in suit/rank order
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Full deck, shuffled
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    /// Deck that deals `order` front to back
    pub fn stacked(order: Vec<Card>) -> Self {
        let mut cards = order;
        cards.reverse();
        Self { cards }
    }

    /// Take the top card
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Number of undealt cards
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Face-up discard pile
#[derive(Clone, Debug, Default)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Take the most recently discarded card
    pub fn take(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from most to least recent
    pub fn iter_recent(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().rev()
    }
}
