//! Tournament execution - all-pairs round robin
//!
//! Level 1 - Orchestration and Level 2 - Phases

use gin_core::{GenomeId, MatchResult};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::config::TournamentConfig;
use crate::fitness::Tally;
use crate::game_runner::{play_genomes, PairingError};
use crate::match_play::{Entrant, PairingResult};

/// A pairing that produced no result
#[derive(Clone, Debug, PartialEq)]
pub struct PairingFailure {
    pub first: GenomeId,
    pub second: GenomeId,
    pub error: PairingError,
}

/// Result of a tournament
#[derive(Clone, Debug, Default)]
pub struct TournamentResult {
    /// Completed pairings in schedule order
    pub matches: Vec<PairingResult>,
    /// Merged tally per entrant; entrants with no completed match hold zeros
    pub tallies: FxHashMap<GenomeId, Tally>,
    /// Pairings that were aborted and left out of the tallies
    pub failures: Vec<PairingFailure>,
}

impl TournamentResult {
    pub fn tally(&self, id: GenomeId) -> Option<&Tally> {
        self.tallies.get(&id)
    }

    /// Number of pairings scheduled
    pub fn pairings(&self) -> usize {
        self.matches.len() + self.failures.len()
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a round-robin tournament (Level 1 orchestration)
///
/// Every unordered pair of entrants plays exactly one match. A failed match
/// never aborts the tournament; it is reported in `failures`.
pub fn run_tournament(entrants: &[Entrant<'_>], config: &TournamentConfig) -> TournamentResult {
    run_pairings(entrants, config, |first, second, config, seed| {
        play_genomes(first.genome, second.genome, config, seed)
    })
}

/// Run a round robin with a custom match function
///
/// `play` receives the two entrants, the config and the pairing seed. Pairings
/// fan out over rayon when `config.parallel` is set; results are merged on the
/// calling thread in schedule order either way.
pub fn run_pairings<F>(entrants: &[Entrant<'_>], config: &TournamentConfig, play: F) -> TournamentResult
where
    F: Fn(&Entrant<'_>, &Entrant<'_>, &TournamentConfig, u64) -> Result<MatchResult, PairingError>
        + Sync,
{
    let pairings = generate_round_robin_pairings(entrants.len());
    let outcomes = execute_all_matches(entrants, &pairings, config, &play);
    let result = merge_outcomes(entrants, outcomes);

    debug!(
        entrants = entrants.len(),
        matches = result.matches.len(),
        failures = result.failures.len(),
        "tournament complete"
    );
    result
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

type Outcome = (usize, usize, Result<MatchResult, PairingError>);

/// Execute every pairing, in parallel if configured
fn execute_all_matches<F>(
    entrants: &[Entrant<'_>],
    pairings: &[(usize, usize)],
    config: &TournamentConfig,
    play: &F,
) -> Vec<Outcome>
where
    F: Fn(&Entrant<'_>, &Entrant<'_>, &TournamentConfig, u64) -> Result<MatchResult, PairingError>
        + Sync,
{
    let base_seed = config.base_seed();
    let run = |(index, &(i, j)): (usize, &(usize, usize))| {
        let seed = base_seed.wrapping_add(index as u64);
        (i, j, play(&entrants[i], &entrants[j], config, seed))
    };

    if config.parallel {
        pairings.par_iter().enumerate().map(run).collect()
    } else {
        pairings.iter().enumerate().map(run).collect()
    }
}

/// Fold match outcomes into per-entrant tallies
fn merge_outcomes(entrants: &[Entrant<'_>], outcomes: Vec<Outcome>) -> TournamentResult {
    let mut result = TournamentResult::default();
    for entrant in entrants {
        result.tallies.entry(entrant.id).or_default();
    }

    for (i, j, outcome) in outcomes {
        let (first, second) = (entrants[i].id, entrants[j].id);
        match outcome {
            Ok(match_result) => {
                let pairing = PairingResult {
                    first,
                    second,
                    result: match_result,
                };
                for id in [first, second] {
                    if let Some(tally) = pairing.tally_for(id) {
                        result.tallies.entry(id).or_default().absorb(&tally);
                    }
                }
                result.matches.push(pairing);
            }
            Err(error) => {
                warn!(%first, %second, %error, "pairing failed, skipping");
                result.failures.push(PairingFailure {
                    first,
                    second,
                    error,
                });
            }
        }
    }
    result
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Generate all pairings for round-robin
pub fn generate_round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}
