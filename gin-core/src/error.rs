//! Error types for genomes and matches

use crate::game::Seat;
use crate::policy::{Action, Phase};

/// Malformed genome contents
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenomeError {
    #[error("invalid genome: gene {index} is not a finite number ({value})")]
    InvalidGenome { index: usize, value: f64 },

    #[error("genome has {actual} genes, topology needs {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Conditions that abort a single match.
///
/// These indicate a defective decision policy (or a rigged deck) and are
/// reported to the caller rather than recovered inside the match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{seat} tried to draw while already holding 11 cards")]
    InvalidDraw { seat: Seat },

    #[error("{seat} tried to discard card index {index}, which is not in hand")]
    HandConsistency { seat: Seat, index: usize },

    #[error("decision policy for {seat} returned no action")]
    StrategyExecution { seat: Seat },

    #[error("{seat} tried to pick up from an empty discard pile")]
    EmptyDiscardPile { seat: Seat },

    #[error("{seat} chose {action:?} during the {phase} phase")]
    IllegalAction {
        seat: Seat,
        phase: Phase,
        action: Action,
    },

    #[error("deck ran out of cards")]
    DeckExhausted,
}

impl GameError {
    /// Seat responsible for the error, if any
    pub fn seat(&self) -> Option<Seat> {
        match self {
            GameError::InvalidDraw { seat }
            | GameError::HandConsistency { seat, .. }
            | GameError::StrategyExecution { seat }
            | GameError::EmptyDiscardPile { seat }
            | GameError::IllegalAction { seat, .. } => Some(*seat),
            GameError::DeckExhausted => None,
        }
    }
}
