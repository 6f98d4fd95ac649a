//! Player hand and deadwood counting
//!
//! Deadwood is the point value of the cards left over after the hand is split
//! into disjoint melds in the cheapest possible way. A meld is either a set
//! (three or four cards of one rank) or a run (three or more consecutive cards
//! of one suit, Ace low).

use crate::card::Card;
use std::fmt;

/// Maximum cards a hand may hold (mid-turn)
pub const MAX_HAND_SIZE: usize = 11;

/// Cards held by one player, in the order they were received
#[derive(Clone, Debug, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from explicit cards
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the card at `index`, preserving the order of the rest
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= MAX_HAND_SIZE
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Card rankings in hand order, zero padded to `slots`
    pub fn snapshot(&self, slots: usize) -> Vec<u8> {
        let mut out: Vec<u8> = self.cards.iter().take(slots).map(Card::ranking).collect();
        out.resize(slots, 0);
        out
    }

    /// Minimum unmatched point value over all meld arrangements
    pub fn deadwood(&self) -> u32 {
        let values: Vec<u32> = self.cards.iter().map(Card::value).collect();
        let melds = find_melds(&self.cards);
        let all = if self.cards.is_empty() {
            0
        } else {
            u32::MAX >> (32 - self.cards.len())
        };
        min_deadwood(all, &values, &melds)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// MELD SEARCH
// ============================================================================

/// Every possible meld, as a bitmask of card indices
fn find_melds(cards: &[Card]) -> Vec<u32> {
    let mut melds = Vec::new();

    // Sets: any 3 (or all 4) cards sharing a rank
    let mut by_rank: [Vec<usize>; 14] = Default::default();
    for (i, card) in cards.iter().enumerate() {
        by_rank[card.rank.ordinal() as usize].push(i);
    }
    for group in by_rank.iter().filter(|g| g.len() >= 3) {
        let n = group.len();
        for a in 0..n {
            for b in (a + 1)..n {
                for c in (b + 1)..n {
                    melds.push((1 << group[a]) | (1 << group[b]) | (1 << group[c]));
                }
            }
        }
        if n >= 4 {
            melds.push(group.iter().fold(0, |m, &i| m | (1 << i)));
        }
    }

    // Runs: every contiguous window of length >= 3 within a same-suit sequence
    let mut by_suit: [Vec<(u8, usize)>; 4] = Default::default();
    for (i, card) in cards.iter().enumerate() {
        by_suit[card.suit as usize].push((card.rank.ordinal(), i));
    }
    for suited in &mut by_suit {
        suited.sort_unstable();
        let mut start = 0;
        while start < suited.len() {
            let mut end = start + 1;
            while end < suited.len() && suited[end].0 == suited[end - 1].0 + 1 {
                end += 1;
            }
            let sequence = &suited[start..end];
            for lo in 0..sequence.len() {
                for hi in (lo + 3)..=sequence.len() {
                    melds.push(sequence[lo..hi].iter().fold(0, |m, &(_, i)| m | (1 << i)));
                }
            }
            start = end;
        }
    }

    melds
}

/// Branch on the lowest remaining card: leave it unmatched, or use it in any
/// meld that fits entirely within the remaining cards.
fn min_deadwood(remaining: u32, values: &[u32], melds: &[u32]) -> u32 {
    if remaining == 0 {
        return 0;
    }
    let i = remaining.trailing_zeros() as usize;
    let bit = 1u32 << i;

    let mut best = values[i] + min_deadwood(remaining & !bit, values, melds);
    for &meld in melds {
        if meld & bit != 0 && meld & remaining == meld {
            best = best.min(min_deadwood(remaining & !meld, values, melds));
        }
    }
    best
}
