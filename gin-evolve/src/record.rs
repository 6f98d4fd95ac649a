//! Per-genome performance record

use gin_tournament::Tally;
use serde::{Deserialize, Serialize};

/// Lifetime results of one population member
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u64,
    /// Generation the member was born into
    pub generation: u32,
    /// Generations since the last fully random ancestor
    pub mutation_depth: u32,
}

impl GenomeRecord {
    pub fn new(generation: u32, mutation_depth: u32) -> Self {
        Self {
            generation,
            mutation_depth,
            ..Self::default()
        }
    }

    /// Merge a tournament tally into the record
    pub fn absorb(&mut self, tally: &Tally) {
        self.wins += tally.wins;
        self.draws += tally.draws;
        self.losses += tally.losses;
        self.points += tally.points;
    }

    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Generations survived as of `current`, at least 1
    pub fn age(&self, current: u32) -> u32 {
        (current + 1).saturating_sub(self.generation).max(1)
    }

    /// Draws count half. Zero when no games were played.
    pub fn winrate(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.0
        } else {
            (f64::from(self.wins) + 0.5 * f64::from(self.draws)) / f64::from(games)
        }
    }

    pub fn points_per_generation(&self, current: u32) -> f64 {
        self.points as f64 / f64::from(self.age(current))
    }

    pub fn points_per_win(&self) -> f64 {
        self.points as f64 / f64::from(self.wins.max(1))
    }
}
