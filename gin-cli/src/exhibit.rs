//! Exhibit command - play the best stored genomes against each other
//!
//! Matches are played with verbose diagnostics; run with `-v` (or
//! `RUST_LOG=debug`) to see the narration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gin_core::{Diagnostics, GenomeId, HandOutcome, MatchResult, Seat};
use gin_evolve::{EvolutionConfig, Population};
use gin_tournament::{GameRunner, DEFAULT_SEED};

use crate::create_rng;

#[derive(Args)]
pub struct ExhibitArgs {
    /// Population file written by `evolve`
    #[arg(long, value_name = "FILE")]
    pub storage: PathBuf,

    /// Number of matches to play
    #[arg(long, default_value = "2")]
    pub matches: usize,
}

/// Run exhibit command
pub fn run(args: ExhibitArgs, seed: Option<u64>) -> Result<()> {
    let mut population = Population::new(EvolutionConfig::default(), create_rng(seed))
        .context("Invalid evolution settings")?;
    population
        .try_load(&args.storage)
        .with_context(|| format!("Failed to load population: {}", args.storage.display()))?;

    exhibit_top(&population, args.matches, seed)
}

/// Play `matches` matches between the two best members and print each result
pub fn exhibit_top(population: &Population, matches: usize, seed: Option<u64>) -> Result<()> {
    let top = population.top_members(2);
    let [(first_id, first), (second_id, second)] = top.as_slice() else {
        anyhow::bail!("Need at least two genomes to exhibit, found {}", top.len());
    };

    let config = population
        .config()
        .tournament
        .with_diagnostics(Diagnostics::verbose())
        .with_seed(seed.unwrap_or(DEFAULT_SEED));
    let mut runner = GameRunner::new(config);

    println!(
        "\n=== Exhibition: {} vs {} (generation {}) ===",
        first_id,
        second_id,
        population.generation()
    );
    for number in 1..=matches {
        match runner.play(&first.genome, &second.genome) {
            Ok(result) => print_match(number, *first_id, *second_id, &result),
            Err(e) => println!("Match {}: aborted ({})", number, e),
        }
    }
    Ok(())
}

fn print_match(number: usize, first: GenomeId, second: GenomeId, result: &MatchResult) {
    let name = |seat: Seat| match seat {
        Seat::First => first,
        Seat::Second => second,
    };

    println!("Match {}:", number);
    for hand in &result.hands {
        println!("  {}", describe_hand(hand, name));
    }
    let winner = match result.leader() {
        Some(seat) => name(seat).to_string(),
        None => "nobody".to_string(),
    };
    println!(
        "  Final: {} {} - {} {}, won by {}",
        first, result.first.score, result.second.score, second, winner
    );
}

fn describe_hand(hand: &HandOutcome, name: impl Fn(Seat) -> GenomeId) -> String {
    match *hand {
        HandOutcome::Knock { knocker, points } => {
            format!("{} knocks for {} points", name(knocker), points)
        }
        HandOutcome::Gin { knocker, points } => {
            format!("{} goes gin for {} points", name(knocker), points)
        }
        HandOutcome::Undercut { knocker, points } => format!(
            "{} knocks, undercut by {} for {} points",
            name(knocker),
            name(knocker.opponent()),
            points
        ),
        HandOutcome::Draw => "drawn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gin_core::Topology;
    use gin_tournament::TournamentConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_describe_hand() {
        let name = |seat: Seat| match seat {
            Seat::First => GenomeId(3),
            Seat::Second => GenomeId(8),
        };
        let undercut = HandOutcome::Undercut {
            knocker: Seat::First,
            points: 30,
        };
        assert_eq!(
            describe_hand(&undercut, name),
            "#3 knocks, undercut by #8 for 30 points"
        );
        assert_eq!(describe_hand(&HandOutcome::Draw, name), "drawn");
    }

    #[test]
    fn test_exhibit_top_plays_small_population() {
        let config = EvolutionConfig::new(3)
            .with_tournament(TournamentConfig::default().with_topology(Topology::new(44, 4, 3)));
        let population = Population::new(config, ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(exhibit_top(&population, 1, Some(5)).is_ok());
    }
}
