//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use gin_core::{Diagnostics, MatchRules, Topology};

/// Base seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Tournament configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TournamentConfig {
    /// Rules every match is played under
    pub rules: MatchRules,
    /// Predictor shape shared by all entrants
    pub topology: Topology,
    /// Whether to fan pairings out over the rayon pool
    pub parallel: bool,
    /// Base seed; pairing `i` deals from `seed + i`
    pub seed: Option<u64>,
    /// Narration level passed to each match
    pub diagnostics: Diagnostics,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rules: MatchRules::default(),
            topology: Topology::gin(),
            parallel: false,
            seed: None,
            diagnostics: Diagnostics::quiet(),
        }
    }
}

impl TournamentConfig {
    pub fn with_rules(mut self, rules: MatchRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Seed the pairing sequence starts from
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TournamentConfig::default();
        assert!(!config.parallel);
        assert_eq!(config.base_seed(), DEFAULT_SEED);
        assert_eq!(config.topology, Topology::gin());
        assert_eq!(config.rules.decided_hands, 1);
    }

    #[test]
    fn test_builders() {
        let config = TournamentConfig::default()
            .with_parallel(true)
            .with_seed(9)
            .with_topology(Topology::new(4, 3, 3));
        assert!(config.parallel);
        assert_eq!(config.base_seed(), 9);
        assert_eq!(config.topology.gene_count(), 4 + 12 + 9 + 9);
    }
}
