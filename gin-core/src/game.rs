//! Two-player Gin Rummy match state machine
//!
//! A match deals, lets each seat's decision policy act in turn, validates
//! knock and gin claims, and scores each hand until enough hands have been
//! decided. Policies observe the game only through snapshot listeners.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::deck::{Deck, DiscardPile};
use crate::diagnostics::Diagnostics;
use crate::error::GameError;
use crate::hand::Hand;
use crate::observe::{Observers, HAND_SLOTS, TABLE_SLOTS};
use crate::policy::{Action, DecisionPolicy, Phase};

/// Cards dealt to each seat before the first seat takes its extra card
const DEAL_SIZE: usize = 10;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Seat at the table. The first seat is dealt the extra card and acts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    First = 0,
    Second = 1,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    pub fn opponent(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => f.write_str("player 1"),
            Seat::Second => f.write_str("player 2"),
        }
    }
}

/// Request to end the hand, raised by a knocking discard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Claim {
    Knock,
    Gin,
}

/// How a single hand ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    /// Valid knock, defender held more deadwood
    Knock { knocker: Seat, points: u32 },
    /// Gin, or a knock with no deadwood at all
    Gin { knocker: Seat, points: u32 },
    /// Valid knock, but the defender held as little deadwood or less
    Undercut { knocker: Seat, points: u32 },
    /// Deck ran low or the turn limit was reached
    Draw,
}

impl HandOutcome {
    /// Seat credited with the hand
    pub fn winner(&self) -> Option<Seat> {
        match *self {
            HandOutcome::Knock { knocker, .. } | HandOutcome::Gin { knocker, .. } => Some(knocker),
            HandOutcome::Undercut { knocker, .. } => Some(knocker.opponent()),
            HandOutcome::Draw => None,
        }
    }

    /// Points awarded to the winner
    pub fn points(&self) -> u32 {
        match *self {
            HandOutcome::Knock { points, .. }
            | HandOutcome::Gin { points, .. }
            | HandOutcome::Undercut { points, .. } => points,
            HandOutcome::Draw => 0,
        }
    }
}

/// Running totals for one seat
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub score: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// Final scoreboard of a match
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub first: SeatRecord,
    pub second: SeatRecord,
    /// Outcome of every hand, in play order
    pub hands: Vec<HandOutcome>,
}

impl MatchResult {
    pub fn record(&self, seat: Seat) -> &SeatRecord {
        match seat {
            Seat::First => &self.first,
            Seat::Second => &self.second,
        }
    }

    /// Seat with the higher score, `None` when level
    pub fn leader(&self) -> Option<Seat> {
        match self.first.score.cmp(&self.second.score) {
            std::cmp::Ordering::Greater => Some(Seat::First),
            std::cmp::Ordering::Less => Some(Seat::Second),
            std::cmp::Ordering::Equal => None,
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Scoring and termination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    /// Highest deadwood a valid knock may carry
    pub knock_threshold: u32,
    /// Turns before the hand is declared a draw
    pub max_turns: u32,
    pub gin_bonus: u32,
    pub undercut_bonus: u32,
    /// The hand is drawn once the deck holds this many cards or fewer
    pub deck_floor: usize,
    /// Hands are played until wins plus draws over both seats reach this
    pub decided_hands: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            knock_threshold: 10,
            max_turns: 60,
            gin_bonus: 25,
            undercut_bonus: 25,
            deck_floor: 2,
            decided_hands: 1,
        }
    }
}

impl MatchRules {
    pub fn with_knock_threshold(mut self, threshold: u32) -> Self {
        self.knock_threshold = threshold;
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn with_decided_hands(mut self, hands: u32) -> Self {
        self.decided_hands = hands;
        self
    }

    /// Score a validated claim. `claim` must already reflect reclassification
    /// of a zero-deadwood knock to gin.
    pub fn score(
        &self,
        claim: Claim,
        knocker: Seat,
        knocker_deadwood: u32,
        defender_deadwood: u32,
    ) -> HandOutcome {
        match claim {
            Claim::Gin => HandOutcome::Gin {
                knocker,
                points: defender_deadwood + self.gin_bonus,
            },
            Claim::Knock => {
                let difference = knocker_deadwood.abs_diff(defender_deadwood);
                if defender_deadwood <= knocker_deadwood {
                    HandOutcome::Undercut {
                        knocker,
                        points: difference + self.undercut_bonus,
                    }
                } else {
                    HandOutcome::Knock {
                        knocker,
                        points: difference,
                    }
                }
            }
        }
    }
}

// ============================================================================
// MATCH
// ============================================================================

/// A match between two decision policies
pub struct GinMatch {
    rules: MatchRules,
    diagnostics: Diagnostics,
    rng: ChaCha8Rng,

    policies: [Box<dyn DecisionPolicy>; 2],
    hands: [Hand; 2],
    hand_observers: [Observers; 2],
    table_observers: Observers,

    deck: Deck,
    discard: DiscardPile,
    /// Replaces the shuffled deck for the next hand only
    stacked: Option<Deck>,

    exposed: [bool; 2],
    turns: u32,
    records: [SeatRecord; 2],
    outcomes: Vec<HandOutcome>,
}

impl GinMatch {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(
        first: Box<dyn DecisionPolicy>,
        second: Box<dyn DecisionPolicy>,
        rules: MatchRules,
        seed: u64,
    ) -> Self {
        Self {
            rules,
            diagnostics: Diagnostics::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            policies: [first, second],
            hands: [Hand::new(), Hand::new()],
            hand_observers: [Observers::new(), Observers::new()],
            table_observers: Observers::new(),
            deck: Deck::standard(),
            discard: DiscardPile::new(),
            stacked: None,
            exposed: [false; 2],
            turns: 0,
            records: [SeatRecord::default(); 2],
            outcomes: Vec::new(),
        }
    }

    /// Deal the first hand from `deck` instead of a shuffled one
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.stacked = Some(deck);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Listeners for one seat's hand
    pub fn hand_observers_mut(&mut self, seat: Seat) -> &mut Observers {
        &mut self.hand_observers[seat.index()]
    }

    /// Listeners for the deck count and discard pile
    pub fn table_observers_mut(&mut self) -> &mut Observers {
        &mut self.table_observers
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    /// Whether the seat made an improper knock or gin call this hand
    pub fn exposed(&self, seat: Seat) -> bool {
        self.exposed[seat.index()]
    }

    /// Turns taken in the current (or last) hand
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard
    }

    /// Scoreboard so far
    pub fn result(&self) -> MatchResult {
        MatchResult {
            first: self.records[0],
            second: self.records[1],
            hands: self.outcomes.clone(),
        }
    }

    /// Table snapshot: undealt count, then discard rankings most recent first
    pub fn table_snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TABLE_SLOTS);
        out.push(u8::try_from(self.deck.remaining()).unwrap_or(u8::MAX));
        out.extend(self.discard.iter_recent().take(TABLE_SLOTS - 1).map(|c| c.ranking()));
        out.resize(TABLE_SLOTS, 0);
        out
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Play hands until enough have been decided
    pub fn run(&mut self) -> Result<MatchResult, GameError> {
        while self.decided() < self.rules.decided_hands {
            let outcome = self.play_hand()?;
            self.record(outcome);
        }

        if self.diagnostics.outcomes() {
            let result = self.result();
            debug!(
                first = result.first.score,
                second = result.second.score,
                "match complete: {}",
                match result.leader() {
                    Some(seat) => format!("{} wins", seat),
                    None => "level".to_string(),
                }
            );
        }
        Ok(self.result())
    }

    fn decided(&self) -> u32 {
        self.records.iter().map(|r| r.wins + r.draws).sum()
    }

    /// Play one hand to its outcome
    fn play_hand(&mut self) -> Result<HandOutcome, GameError> {
        self.reset_hand();
        self.deal()?;

        let mut seat = Seat::First;
        loop {
            if self.deck.remaining() <= self.rules.deck_floor || self.turns >= self.rules.max_turns {
                if self.diagnostics.outcomes() {
                    debug!(turns = self.turns, deck = self.deck.remaining(), "hand drawn");
                }
                return Ok(HandOutcome::Draw);
            }

            self.turns += 1;
            if let Some(claim) = self.take_turn(seat)? {
                if let Some(outcome) = self.resolve_claim(seat, claim) {
                    if self.diagnostics.outcomes() {
                        debug!(turns = self.turns, "hand over: {:?}", outcome);
                    }
                    return Ok(outcome);
                }
            }

            if self.diagnostics.actions() {
                trace!(
                    "{} holds {} (deadwood {}), {} holds {} (deadwood {}), deck {}, discard top {}",
                    Seat::First,
                    self.hands[0],
                    self.hands[0].deadwood(),
                    Seat::Second,
                    self.hands[1],
                    self.hands[1].deadwood(),
                    self.deck.remaining(),
                    self.discard
                        .top()
                        .map_or_else(|| "-".to_string(), |c| c.to_string()),
                );
            }
            seat = seat.opponent();
        }
    }

    fn reset_hand(&mut self) {
        self.deck = match self.stacked.take() {
            Some(deck) => deck,
            None => Deck::shuffled(&mut self.rng),
        };
        self.discard = DiscardPile::new();
        for hand in &mut self.hands {
            hand.clear();
        }
        self.exposed = [false; 2];
        self.turns = 0;
    }

    /// Ten cards each, alternating, then an eleventh to the first seat
    fn deal(&mut self) -> Result<(), GameError> {
        for _ in 0..DEAL_SIZE {
            self.draw_card(Seat::First)?;
            self.draw_card(Seat::Second)?;
        }
        self.draw_card(Seat::First)?;

        if self.diagnostics.actions() {
            debug!("{} is dealt {}", Seat::First, self.hands[0]);
            debug!("{} is dealt {}", Seat::Second, self.hands[1]);
        }
        Ok(())
    }

    /// A seat holding ten cards acts twice, holding eleven it only discards
    fn take_turn(&mut self, seat: Seat) -> Result<Option<Claim>, GameError> {
        if !self.hands[seat.index()].is_full() {
            self.act(seat, Phase::Start)?;
        }
        self.act(seat, Phase::End)
    }

    fn act(&mut self, seat: Seat, phase: Phase) -> Result<Option<Claim>, GameError> {
        let action = self.policies[seat.index()]
            .decide(phase)
            .ok_or(GameError::StrategyExecution { seat })?;
        if !action.fits(phase) {
            return Err(GameError::IllegalAction {
                seat,
                phase,
                action,
            });
        }

        let claim = match action {
            Action::Draw => {
                self.draw_card(seat)?;
                None
            }
            Action::PickupFromDiscard => {
                self.pickup(seat)?;
                None
            }
            Action::Discard(index) => {
                self.discard_at(seat, index)?;
                None
            }
            Action::Knock(index) => {
                self.discard_at(seat, index)?;
                Some(Claim::Knock)
            }
            Action::KnockGin(index) => {
                self.discard_at(seat, index)?;
                Some(Claim::Gin)
            }
        };

        if self.diagnostics.actions() {
            debug!(turn = self.turns, %phase, "{}: {}", seat, action);
        }
        Ok(claim)
    }

    fn draw_card(&mut self, seat: Seat) -> Result<(), GameError> {
        if self.hands[seat.index()].is_full() {
            return Err(GameError::InvalidDraw { seat });
        }
        let card = self.deck.deal().ok_or(GameError::DeckExhausted)?;
        self.hands[seat.index()].add(card);
        self.notify(seat);
        Ok(())
    }

    fn pickup(&mut self, seat: Seat) -> Result<(), GameError> {
        if self.hands[seat.index()].is_full() {
            return Err(GameError::InvalidDraw { seat });
        }
        let card = self
            .discard
            .take()
            .ok_or(GameError::EmptyDiscardPile { seat })?;
        self.hands[seat.index()].add(card);
        self.notify(seat);
        Ok(())
    }

    fn discard_at(&mut self, seat: Seat, index: usize) -> Result<(), GameError> {
        let card = self.hands[seat.index()]
            .remove_at(index)
            .ok_or(GameError::HandConsistency { seat, index })?;
        self.discard.push(card);
        self.notify(seat);
        Ok(())
    }

    /// Push fresh snapshots of the seat's hand and of the table
    fn notify(&self, seat: Seat) {
        let hand = self.hands[seat.index()].snapshot(HAND_SLOTS);
        self.hand_observers[seat.index()].notify(&hand);
        self.table_observers.notify(&self.table_snapshot());
    }

    // ========================================================================
    // CLAIMS AND SCORING
    // ========================================================================

    /// Validate a claim after its discard. Improper claims expose the seat and
    /// play continues.
    fn resolve_claim(&mut self, knocker: Seat, claim: Claim) -> Option<HandOutcome> {
        let knocker_deadwood = self.hands[knocker.index()].deadwood();

        let accepted = match claim {
            Claim::Knock if knocker_deadwood > self.rules.knock_threshold => None,
            Claim::Knock if knocker_deadwood == 0 => Some(Claim::Gin),
            Claim::Knock => Some(Claim::Knock),
            Claim::Gin if knocker_deadwood != 0 => None,
            Claim::Gin => Some(Claim::Gin),
        };

        let Some(accepted) = accepted else {
            self.exposed[knocker.index()] = true;
            if self.diagnostics.outcomes() {
                debug!(
                    deadwood = knocker_deadwood,
                    "{} made an improper {:?} claim and is exposed", knocker, claim
                );
            }
            return None;
        };

        let defender_deadwood = self.hands[knocker.opponent().index()].deadwood();
        Some(
            self.rules
                .score(accepted, knocker, knocker_deadwood, defender_deadwood),
        )
    }

    fn record(&mut self, outcome: HandOutcome) {
        match outcome.winner() {
            Some(winner) => {
                let w = &mut self.records[winner.index()];
                w.score += outcome.points();
                w.wins += 1;
                self.records[winner.opponent().index()].losses += 1;
            }
            None => {
                for record in &mut self.records {
                    record.draws += 1;
                }
            }
        }
        self.outcomes.push(outcome);
    }
}
