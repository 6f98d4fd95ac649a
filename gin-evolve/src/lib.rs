//! Gin Evolution - Genetic algorithm over gin rummy strategies
//!
//! This crate provides the evolutionary loop:
//! - Population management and the generation step
//! - Ranking and survivor selection
//! - Mutation and crossover operators
//! - Leaderboards and persistence
//!
//! ## Levels
//!
//! - Level 1: [`Population::step`] orchestrates a generation
//! - Level 2: tournament, cull, breed, replenish
//! - Level 3: [`cross`], [`mutate`], [`ranking_score`]

mod crossover;
mod error;
mod leaderboard;
mod mutation;
mod persist;
mod population;
mod record;
mod selection;

pub use crossover::cross;
pub use error::{EvolveError, PersistError};
pub use leaderboard::{GenerationSummary, Leaderboard, LeaderboardEntry};
pub use mutation::{
    mutate, DEFAULT_MUTATION_PROBABILITY, MUTATION_SIGMA, OFFSPRING_MUTATION_PROBABILITY,
};
pub use persist::{Snapshot, StoredMember};
pub use population::{
    EvolutionConfig, GenerationReport, Member, Population, DEFAULT_PERSIST_EVERY,
};
pub use record::GenomeRecord;
pub use selection::{ranking_score, select_elite};
