//! Integration tests for the gin strategy evolver
//!
//! Tests the full stack: cards and hands, neural policies playing matches,
//! tournaments, and the evolutionary loop with persistence

use gin_core::{Card, FeedForward, Genome, GenomeError, GenomeId, Hand, Topology};
use gin_evolve::{EvolutionConfig, Population};
use gin_tournament::{play_genomes, run_tournament, Entrant, GameRunner, TournamentConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Small predictor so matches stay quick
fn small_topology() -> Topology {
    Topology::new(44, 6, 3)
}

fn small_tournament() -> TournamentConfig {
    TournamentConfig::default().with_topology(small_topology())
}

fn random_genomes(n: usize, seed: u64) -> Vec<Genome> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| Genome::random(small_topology().gene_count(), &mut rng))
        .collect()
}

fn small_population(size: usize, seed: u64) -> Population {
    let config = EvolutionConfig::new(size).with_tournament(small_tournament());
    Population::new(config, ChaCha8Rng::seed_from_u64(seed)).unwrap()
}

// ============================================================================
// CORE TESTS
// ============================================================================

#[test]
fn test_parsed_cards_meld_away() {
    let mut hand = Hand::default();
    for text in ["Ac", "2c", "3c", "4c", "5d", "5h", "5s"] {
        hand.add(text.parse::<Card>().unwrap());
    }
    assert_eq!(hand.deadwood(), 0);

    hand.add("Kd".parse::<Card>().unwrap());
    assert_eq!(hand.deadwood(), 10);
}

#[test]
fn test_genome_validation() {
    assert!(matches!(
        Genome::new(vec![0.0, f64::NAN]),
        Err(GenomeError::InvalidGenome { index: 1, .. })
    ));

    let short = Genome::new(vec![0.0; 10]).unwrap();
    assert!(FeedForward::new(small_topology(), &short).is_err());
}

// ============================================================================
// MATCH AND TOURNAMENT TESTS
// ============================================================================

#[test]
fn test_neural_match_completes() {
    let genomes = random_genomes(2, 1);
    let result = play_genomes(&genomes[0], &genomes[1], &small_tournament(), 17).unwrap();

    // one decided hand ends the match
    assert_eq!(result.hands.len(), 1);
    let first = result.first;
    let second = result.second;
    assert_eq!(first.wins, second.losses);
    assert_eq!(first.draws, second.draws);
}

#[test]
fn test_game_runner_is_reproducible() {
    let genomes = random_genomes(2, 2);
    let config = small_tournament().with_seed(99);

    let mut a = GameRunner::new(config);
    let mut b = GameRunner::new(config);
    for _ in 0..3 {
        assert_eq!(
            a.play(&genomes[0], &genomes[1]).unwrap(),
            b.play(&genomes[0], &genomes[1]).unwrap()
        );
    }
}

#[test]
fn test_round_robin_tallies() {
    let genomes = random_genomes(5, 3);
    let entrants: Vec<Entrant<'_>> = genomes
        .iter()
        .enumerate()
        .map(|(i, g)| Entrant::new(GenomeId(i as u64), g))
        .collect();

    let sequential = run_tournament(&entrants, &small_tournament().with_seed(5));
    let parallel = run_tournament(&entrants, &small_tournament().with_seed(5).with_parallel(true));

    assert_eq!(sequential.pairings(), 10);
    assert!(sequential.failures.is_empty());
    for entrant in &entrants {
        let tally = sequential.tally(entrant.id).unwrap();
        assert_eq!(tally.games(), 4);
        assert_eq!(Some(tally), parallel.tally(entrant.id));
    }
}

// ============================================================================
// EVOLUTION TESTS
// ============================================================================

#[test]
fn test_evolution_keeps_population_invariants() {
    let mut population = small_population(6, 4);
    let mut seen: HashSet<GenomeId> = population.members().map(|(id, _)| id).collect();

    for generation in 1..=3 {
        let report = population.step();
        assert_eq!(population.len(), 6);
        assert_eq!(population.generation(), generation);
        assert_eq!(report.leaderboard.generation, generation - 1);

        let scores: Vec<f64> = report.leaderboard.entries.iter().map(|e| e.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        for (id, member) in population.members() {
            if seen.insert(id) {
                assert_eq!(member.record.generation, generation);
                assert_eq!(member.record.games(), 0);
            }
        }
    }
}

#[test]
fn test_store_resume_and_exhibit() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("population.json");

    let mut population = small_population(5, 6);
    population.step();
    population.step();
    assert!(population.store(&path));

    let mut resumed = small_population(3, 7);
    assert!(resumed.load(&path));
    assert_eq!(resumed.generation(), 2);
    assert_eq!(resumed.len(), 5);

    let original_ids: Vec<GenomeId> = population.members().map(|(id, _)| id).collect();
    let resumed_ids: Vec<GenomeId> = resumed.members().map(|(id, _)| id).collect();
    assert_eq!(original_ids, resumed_ids);

    resumed.step();
    assert_eq!(resumed.generation(), 3);
    assert_eq!(resumed.len(), 5);

    let top = resumed.top_members(2);
    assert_eq!(top.len(), 2);
    let mut runner = GameRunner::new(resumed.config().tournament.with_seed(1));
    assert!(runner.play(&top[0].1.genome, &top[1].1.genome).is_ok());
}
