//! Decision policies - what a seat does when it is asked to act

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::net::Predictor;
use crate::observe::{Observer, SnapshotBuffer, HAND_SLOTS, TABLE_SLOTS};

/// Largest card ranking, used to normalise snapshot inputs
const RANKING_SCALE: f64 = 52.0;

/// Output thresholds of the neural policy
const PICKUP_THRESHOLD: f64 = 0.5;
const KNOCK_THRESHOLD: f64 = 0.6;
const GIN_THRESHOLD: f64 = 0.8;

/// Which half of a turn the policy is deciding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Draw from the deck or pick up the discard
    Start,
    /// Discard, optionally knocking
    End,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => f.write_str("start"),
            Phase::End => f.write_str("end"),
        }
    }
}

/// A single action. Indices refer to positions in the acting hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Draw,
    PickupFromDiscard,
    Discard(usize),
    Knock(usize),
    KnockGin(usize),
}

impl Action {
    /// Whether this action is allowed in the given phase
    pub fn fits(&self, phase: Phase) -> bool {
        match self {
            Action::Draw | Action::PickupFromDiscard => true,
            Action::Discard(_) | Action::Knock(_) | Action::KnockGin(_) => phase == Phase::End,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Draw => write!(f, "DRAW"),
            Action::PickupFromDiscard => write!(f, "PICKUP-FROM-DISCARD"),
            Action::Discard(i) => write!(f, "DISCARD({})", i),
            Action::Knock(i) => write!(f, "KNOCK({})", i),
            Action::KnockGin(i) => write!(f, "KNOCK-GIN({})", i),
        }
    }
}

/// Chooses the next action for a seat.
///
/// Game state is not passed in: a policy sees the game only through the
/// observers it registered with the match.
pub trait DecisionPolicy: Send {
    fn decide(&mut self, phase: Phase) -> Option<Action>;
}

// ============================================================================
// SCRIPTED POLICY
// ============================================================================

/// Replays a fixed queue of actions, then returns `None`
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, _phase: Phase) -> Option<Action> {
        self.actions.pop_front()
    }
}

// ============================================================================
// NEURAL POLICY
// ============================================================================

/// Queries a predictor with the latest hand and table snapshots.
///
/// Output 0 chooses pickup over draw, output 1 picks the card index to let go,
/// output 2 escalates the discard to a knock or a gin call.
pub struct NeuralPolicy<P: Predictor> {
    predictor: P,
    hand: Arc<SnapshotBuffer>,
    table: Arc<SnapshotBuffer>,
}

impl<P: Predictor> NeuralPolicy<P> {
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            hand: Arc::new(SnapshotBuffer::with_width(HAND_SLOTS)),
            table: Arc::new(SnapshotBuffer::with_width(TABLE_SLOTS)),
        }
    }

    /// Listener to register on this policy's own hand
    pub fn hand_observer(&self) -> Arc<dyn Observer> {
        self.hand.clone()
    }

    /// Listener to register on the table
    pub fn table_observer(&self) -> Arc<dyn Observer> {
        self.table.clone()
    }

    fn inputs(&self, hand: &[u8], table: &[u8]) -> Vec<f64> {
        let mut inputs = Vec::with_capacity(HAND_SLOTS + TABLE_SLOTS);
        inputs.extend(padded(hand, HAND_SLOTS).map(|r| f64::from(r) / RANKING_SCALE));
        inputs.extend(padded(table, TABLE_SLOTS).map(|r| f64::from(r) / RANKING_SCALE));
        inputs
    }
}

impl<P: Predictor> DecisionPolicy for NeuralPolicy<P> {
    fn decide(&mut self, phase: Phase) -> Option<Action> {
        let hand = self.hand.latest();
        let table = self.table.latest();
        let outputs = self.predictor.predict(&self.inputs(&hand, &table));
        let output = |i: usize| outputs.get(i).copied().unwrap_or(0.0);

        match phase {
            Phase::Start => {
                let discard_available = table.get(1).is_some_and(|&r| r != 0);
                if discard_available && output(0) > PICKUP_THRESHOLD {
                    Some(Action::PickupFromDiscard)
                } else {
                    Some(Action::Draw)
                }
            }
            Phase::End => {
                let held = hand.iter().filter(|&&r| r != 0).count();
                if held == 0 {
                    return None;
                }
                let index = ((output(1) * held as f64) as usize).min(held - 1);
                let claim = output(2);
                if claim > GIN_THRESHOLD {
                    Some(Action::KnockGin(index))
                } else if claim > KNOCK_THRESHOLD {
                    Some(Action::Knock(index))
                } else {
                    Some(Action::Discard(index))
                }
            }
        }
    }
}

fn padded(values: &[u8], width: usize) -> impl Iterator<Item = u8> + '_ {
    values
        .iter()
        .copied()
        .chain(std::iter::repeat(0))
        .take(width)
}
