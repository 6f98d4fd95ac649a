//! Population - the generational evolution driver
//!
//! Level 1 - Orchestration
//!
//! One generation: round-robin tournament, rank, cull to the survivors, breed
//! every ordered pair of survivors, replenish with random genomes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use gin_core::{Genome, GenomeId};
use gin_tournament::{run_tournament, Entrant, TournamentConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::crossover::cross;
use crate::error::EvolveError;
use crate::leaderboard::Leaderboard;
use crate::mutation::{mutate, OFFSPRING_MUTATION_PROBABILITY};
use crate::record::GenomeRecord;
use crate::selection::{ranking_score, select_elite};

/// Default autosave interval in generations
pub const DEFAULT_PERSIST_EVERY: u32 = 100;

// ============================================================================
// Configuration
// ============================================================================

/// Evolution configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionConfig {
    /// Members after every replenishment
    pub population_size: usize,
    /// Survivors per generation; `None` keeps `max(2, 10%)` of the population
    pub retain_best: Option<usize>,
    /// How matches are played. The seed is redrawn from the population's
    /// generator every generation.
    pub tournament: TournamentConfig,
    /// Autosave target
    pub storage: Option<PathBuf>,
    /// Autosave every this many generations
    pub persist_every: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            retain_best: None,
            tournament: TournamentConfig::default(),
            storage: None,
            persist_every: DEFAULT_PERSIST_EVERY,
        }
    }
}

impl EvolutionConfig {
    pub fn new(population_size: usize) -> Self {
        Self {
            population_size,
            ..Default::default()
        }
    }

    pub fn with_retain_best(mut self, retain_best: usize) -> Self {
        self.retain_best = Some(retain_best);
        self
    }

    pub fn with_tournament(mut self, tournament: TournamentConfig) -> Self {
        self.tournament = tournament;
        self
    }

    pub fn with_storage(mut self, storage: impl Into<PathBuf>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn with_persist_every(mut self, generations: u32) -> Self {
        self.persist_every = generations;
        self
    }

    /// Number of survivors kept each generation
    pub fn retain_count(&self) -> usize {
        self.retain_best
            .unwrap_or_else(|| (self.population_size / 10).max(2))
    }

    /// Genes per genome
    pub fn gene_count(&self) -> usize {
        self.tournament.topology.gene_count()
    }

    fn validate(&self) -> Result<(), EvolveError> {
        if self.population_size < 2 {
            return Err(EvolveError::InvalidConfig(format!(
                "population size must be at least 2, got {}",
                self.population_size
            )));
        }
        let retain = self.retain_count();
        if retain == 0 || retain > self.population_size {
            return Err(EvolveError::InvalidConfig(format!(
                "retain_best must be between 1 and {}, got {}",
                self.population_size, retain
            )));
        }
        if self.gene_count() == 0 {
            return Err(EvolveError::InvalidConfig("topology has no weights".into()));
        }
        if self.persist_every == 0 {
            return Err(EvolveError::InvalidConfig("persist_every must be positive".into()));
        }
        if self.tournament.rules.decided_hands == 0 {
            return Err(EvolveError::InvalidConfig(
                "matches must need at least one decided hand".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Population
// ============================================================================

/// A genome and its record
#[derive(Clone, Debug)]
pub struct Member {
    pub genome: Genome,
    pub record: GenomeRecord,
}

/// What one call to [`Population::step`] did
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// Ranking after the tournament, before culling
    pub leaderboard: Leaderboard,
    /// Pairings that failed and were left out of the tallies
    pub failed_pairings: usize,
    pub survivors: usize,
    pub offspring: usize,
    pub fresh: usize,
    /// Outcome of the autosave, if one was due
    pub persisted: Option<bool>,
}

/// Identity-keyed population of genomes
pub struct Population {
    pub(crate) config: EvolutionConfig,
    /// Keyed by monotonically allocated ids, so iteration is insertion order
    pub(crate) members: BTreeMap<GenomeId, Member>,
    pub(crate) generation: u32,
    pub(crate) next_id: u64,
    rng: ChaCha8Rng,
}

impl Population {
    /// Seed `population_size` random genomes at generation 0
    pub fn new(config: EvolutionConfig, rng: ChaCha8Rng) -> Result<Self, EvolveError> {
        config.validate()?;

        let mut population = Self {
            config,
            members: BTreeMap::new(),
            generation: 0,
            next_id: 0,
            rng,
        };
        let gene_count = population.config.gene_count();
        for _ in 0..population.config.population_size {
            let genome = Genome::random(gene_count, &mut population.rng);
            population.add_member(genome, 0, 0);
        }
        Ok(population)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current generation counter
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, id: GenomeId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Members in insertion order
    pub fn members(&self) -> impl Iterator<Item = (GenomeId, &Member)> {
        self.members.iter().map(|(id, m)| (*id, m))
    }

    /// Insert a genome with a fresh record; returns its identity
    pub fn add_member(&mut self, genome: Genome, generation: u32, mutation_depth: u32) -> GenomeId {
        let id = GenomeId(self.next_id);
        self.next_id += 1;
        self.members.insert(
            id,
            Member {
                genome,
                record: GenomeRecord::new(generation, mutation_depth),
            },
        );
        id
    }

    /// The `n` best members by ranking score, best first
    pub fn top_members(&self, n: usize) -> Vec<(GenomeId, &Member)> {
        let ranked: Vec<(GenomeId, &Member)> = self.members().collect();
        let scores: Vec<f64> = ranked
            .iter()
            .map(|(_, m)| ranking_score(&m.record, self.generation))
            .collect();
        select_elite(&scores, n)
            .into_iter()
            .map(|i| ranked[i])
            .collect()
    }

    /// Current ranking of every member
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::build(
            self.generation,
            self.members.iter().map(|(id, m)| (*id, &m.record)),
        )
    }

    // ========================================================================
    // Generation step
    // ========================================================================

    /// Run one generation
    pub fn step(&mut self) -> GenerationReport {
        let failed_pairings = self.fitness_test();
        let leaderboard = self.leaderboard();

        let survivors = self.cull();
        let offspring = self.cross_over();
        let fresh = self.replenish();
        self.generation += 1;

        let persisted = match &self.config.storage {
            Some(path) if self.generation % self.config.persist_every == 0 => {
                Some(self.store(path))
            }
            _ => None,
        };

        debug!(
            generation = leaderboard.generation,
            survivors, offspring, fresh, failed_pairings, "generation complete"
        );
        GenerationReport {
            leaderboard,
            failed_pairings,
            survivors,
            offspring,
            fresh,
            persisted,
        }
    }

    /// Play every pair once and merge the tallies; returns failed pairings
    fn fitness_test(&mut self) -> usize {
        let config = self.config.tournament.with_seed(self.rng.gen());
        let entrants: Vec<Entrant<'_>> = self
            .members
            .iter()
            .map(|(id, m)| Entrant::new(*id, &m.genome))
            .collect();
        let result = run_tournament(&entrants, &config);

        for (id, tally) in &result.tallies {
            if let Some(member) = self.members.get_mut(id) {
                member.record.absorb(tally);
            }
        }
        if !result.failures.is_empty() {
            info!(
                generation = self.generation,
                failures = result.failures.len(),
                "some pairings were aborted"
            );
        }
        result.failures.len()
    }

    /// Remove everyone outside the top `retain_best`
    fn cull(&mut self) -> usize {
        let survivors: Vec<GenomeId> = self
            .top_members(self.config.retain_count())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        self.members.retain(|id, _| survivors.contains(id));
        self.members.len()
    }

    /// Breed every ordered pair of distinct survivors, best first, until the
    /// population is full
    fn cross_over(&mut self) -> usize {
        let breeders: Vec<GenomeId> = self
            .top_members(self.config.retain_count())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let born = self.generation + 1;
        let mut offspring = 0;

        'breeding: for &breeder in &breeders {
            for &mate in &breeders {
                if breeder == mate {
                    continue;
                }
                if self.members.len() >= self.config.population_size {
                    break 'breeding;
                }
                let (Some(a), Some(b)) = (self.members.get(&breeder), self.members.get(&mate))
                else {
                    continue;
                };
                let mut child = cross(&a.genome, &b.genome, &mut self.rng);
                mutate(&mut child, OFFSPRING_MUTATION_PROBABILITY, &mut self.rng);
                let depth = a.record.mutation_depth.max(b.record.mutation_depth) + 1;
                self.add_member(child, born, depth);
                offspring += 1;
            }
        }
        offspring
    }

    /// Fill up with random genomes
    fn replenish(&mut self) -> usize {
        let gene_count = self.config.gene_count();
        let born = self.generation + 1;
        let mut fresh = 0;
        while self.members.len() < self.config.population_size {
            let genome = Genome::random(gene_count, &mut self.rng);
            self.add_member(genome, born, 0);
            fresh += 1;
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gin_core::{MatchRules, Topology};
    use rand::SeedableRng;

    fn small_config(size: usize) -> EvolutionConfig {
        EvolutionConfig::new(size)
            .with_tournament(TournamentConfig::default().with_topology(Topology::new(44, 4, 3)))
    }

    fn population(config: EvolutionConfig, seed: u64) -> Population {
        Population::new(config, ChaCha8Rng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_new_population() {
        let pop = population(small_config(6), 1);
        assert_eq!(pop.len(), 6);
        assert_eq!(pop.generation(), 0);
        assert_eq!(pop.config().retain_count(), 2);
        for (_, m) in pop.members() {
            assert_eq!(m.genome.len(), pop.config().gene_count());
            assert_eq!(m.record, GenomeRecord::new(0, 0));
        }
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let rng = || ChaCha8Rng::seed_from_u64(0);
        assert!(Population::new(EvolutionConfig::new(1), rng()).is_err());
        assert!(Population::new(EvolutionConfig::new(4).with_retain_best(0), rng()).is_err());
        assert!(Population::new(EvolutionConfig::new(4).with_retain_best(5), rng()).is_err());
        assert!(Population::new(EvolutionConfig::new(4).with_persist_every(0), rng()).is_err());
        let no_hands = EvolutionConfig::new(4).with_tournament(
            TournamentConfig::default().with_rules(MatchRules::default().with_decided_hands(0)),
        );
        assert!(Population::new(no_hands, rng()).is_err());
        let empty = EvolutionConfig::new(4)
            .with_tournament(TournamentConfig::default().with_topology(Topology::new(0, 0, 0)));
        assert!(matches!(
            Population::new(empty, rng()),
            Err(EvolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_retain_is_ten_percent() {
        assert_eq!(EvolutionConfig::new(30).retain_count(), 3);
        assert_eq!(EvolutionConfig::new(100).retain_count(), 10);
        assert_eq!(EvolutionConfig::new(5).retain_count(), 2);
        assert_eq!(EvolutionConfig::new(30).with_retain_best(7).retain_count(), 7);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut pop = population(small_config(4), 2);
        let before: Vec<GenomeId> = pop.members().map(|(id, _)| id).collect();
        pop.step();
        let max_before = before.iter().max().copied().unwrap();
        for (id, m) in pop.members() {
            if !before.contains(&id) {
                assert!(id > max_before);
                assert_eq!(m.record.generation, 1);
            }
        }
    }

    #[test]
    fn test_step_keeps_size_and_advances_generation() {
        let mut pop = population(small_config(6), 3);
        for expected in 1..=3 {
            let report = pop.step();
            assert_eq!(pop.len(), 6);
            assert_eq!(pop.generation(), expected);
            assert_eq!(report.leaderboard.len(), 6);
            assert_eq!(report.survivors, 2);
            // two survivors breed both ways
            assert_eq!(report.offspring, 2);
            assert_eq!(report.fresh, 2);
            assert_eq!(report.failed_pairings, 0);
            assert_eq!(report.persisted, None);
        }
    }

    #[test]
    fn test_breeding_stops_at_target_size() {
        let config = small_config(4).with_retain_best(3);
        let mut pop = population(config, 4);
        let report = pop.step();
        assert_eq!(pop.len(), 4);
        assert_eq!(report.survivors, 3);
        assert_eq!(report.offspring, 1);
        assert_eq!(report.fresh, 0);
    }

    #[test]
    fn test_offspring_depth_and_survivor_records() {
        let mut pop = population(small_config(5), 5);
        let report = pop.step();
        let survivors: Vec<GenomeId> = report.leaderboard.top(2).iter().map(|e| e.id).collect();

        for (id, m) in pop.members() {
            if survivors.contains(&id) {
                // survivors keep their tallies: four matches each
                assert_eq!(m.record.games(), 4);
                assert_eq!(m.record.generation, 0);
            } else {
                assert_eq!(m.record.games(), 0);
                assert_eq!(m.record.generation, 1);
                assert!(m.record.mutation_depth <= 1);
            }
        }
        let bred = pop.members().filter(|(_, m)| m.record.mutation_depth == 1).count();
        assert_eq!(bred, report.offspring);
    }

    #[test]
    fn test_top_members_follow_ranking() {
        let mut pop = population(small_config(4), 6);
        pop.step();
        let top = pop.top_members(2);
        let board = pop.leaderboard();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, board.entries[0].id);
        assert_eq!(top[1].0, board.entries[1].id);
    }

    #[test]
    fn test_same_seed_same_evolution() {
        let run = |seed| {
            let mut pop = population(small_config(5), seed);
            pop.step();
            pop.step();
            pop.members()
                .map(|(id, m)| (id, m.record, m.genome.genes().to_vec()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }
}
