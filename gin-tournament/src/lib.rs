//! Gin Tournament - Fitness evaluation through match play
//!
//! This crate provides tournament infrastructure:
//! - Match play between two genomes through neural decision policies
//! - All-pairs round robin with optional rayon fan-out
//! - Per-genome tallies merged on a single thread
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: execute_all_matches, merge_outcomes (phases)
//! - Level 3: play_genomes, Tally (steps)
//! - Level 4: utilities, configuration

mod config;
mod fitness;
mod game_runner;
mod match_play;
mod tournament;

pub use config::{TournamentConfig, DEFAULT_SEED};
pub use fitness::Tally;
pub use game_runner::{play_genomes, GameRunner, PairingError};
pub use match_play::{Entrant, PairingResult};
pub use tournament::{
    generate_round_robin_pairings, run_pairings, run_tournament, PairingFailure, TournamentResult,
};
