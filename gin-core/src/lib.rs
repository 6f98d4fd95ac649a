//! Gin Core - Cards, match engine and strategy encoding
//!
//! This crate provides the core game logic for evolving Gin Rummy players:
//! - Cards, deck, discard pile and optimal-meld deadwood counting
//! - Genomes and the feed-forward predictor they parameterise
//! - Decision policies and snapshot observers
//! - The two-player match state machine and its scoring rules

pub mod card;
pub mod deck;
pub mod hand;
pub mod genome;
pub mod net;
pub mod observe;
pub mod policy;
pub mod diagnostics;
pub mod game;
pub mod error;

// Re-exports for convenient access
pub use card::{Card, ParseCardError, Rank, Suit};
pub use deck::{Deck, DiscardPile};
pub use hand::{Hand, MAX_HAND_SIZE};
pub use genome::{Genome, GenomeId};
pub use net::{FeedForward, Predictor, Topology};
pub use observe::{Observer, Observers, SnapshotBuffer, HAND_SLOTS, TABLE_SLOTS};
pub use policy::{Action, DecisionPolicy, NeuralPolicy, Phase, ScriptedPolicy};
pub use diagnostics::{Diagnostics, Verbosity};
pub use game::{Claim, GinMatch, HandOutcome, MatchResult, MatchRules, Seat, SeatRecord};
pub use error::{GameError, GenomeError};
