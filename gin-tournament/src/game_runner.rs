//! Game runner - plays matches between genomes
//!
//! Level 3 - Step-level implementation

use gin_core::{
    FeedForward, GameError, Genome, GenomeError, GinMatch, MatchResult, NeuralPolicy, Seat,
    Topology,
};

use crate::config::TournamentConfig;

/// Why a pairing produced no result
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PairingError {
    #[error("match aborted: {0}")]
    Game(#[from] GameError),

    #[error("genome does not fit the topology: {0}")]
    Genome(#[from] GenomeError),
}

fn build_policy(genome: &Genome, topology: Topology) -> Result<NeuralPolicy<FeedForward>, PairingError> {
    Ok(NeuralPolicy::new(FeedForward::new(topology, genome)?))
}

/// Play one match, `first` in the first seat
pub fn play_genomes(
    first: &Genome,
    second: &Genome,
    config: &TournamentConfig,
    seed: u64,
) -> Result<MatchResult, PairingError> {
    let first_policy = build_policy(first, config.topology)?;
    let second_policy = build_policy(second, config.topology)?;

    // Observers are shared handles, so they can be taken before the policies
    // move into the match
    let first_hand = first_policy.hand_observer();
    let first_table = first_policy.table_observer();
    let second_hand = second_policy.hand_observer();
    let second_table = second_policy.table_observer();

    let mut game = GinMatch::new(
        Box::new(first_policy),
        Box::new(second_policy),
        config.rules,
        seed,
    )
    .with_diagnostics(config.diagnostics);

    game.hand_observers_mut(Seat::First).register(first_hand);
    game.hand_observers_mut(Seat::Second).register(second_hand);
    game.table_observers_mut().register(first_table);
    game.table_observers_mut().register(second_table);

    Ok(game.run()?)
}

/// Plays successive matches with an advancing seed
pub struct GameRunner {
    config: TournamentConfig,
    seed_counter: u64,
}

impl GameRunner {
    pub fn new(config: TournamentConfig) -> Self {
        let seed_counter = config.base_seed();
        Self {
            config,
            seed_counter,
        }
    }

    /// Play a single match, returning the scoreboard
    pub fn play(&mut self, first: &Genome, second: &Genome) -> Result<MatchResult, PairingError> {
        let seed = self.next_seed();
        play_genomes(first, second, &self.config, seed)
    }

    /// Get next seed and increment counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }
}
