//! Match play - entrants and the result of pairing two of them
//!
//! Level 2 - Phase-level implementation

use gin_core::{Genome, GenomeId, MatchResult, Seat};

use crate::fitness::Tally;

/// A genome entered into a tournament under its population identity
#[derive(Clone, Copy, Debug)]
pub struct Entrant<'a> {
    pub id: GenomeId,
    pub genome: &'a Genome,
}

impl<'a> Entrant<'a> {
    pub fn new(id: GenomeId, genome: &'a Genome) -> Self {
        Self { id, genome }
    }
}

/// Completed match between two entrants
#[derive(Clone, Debug, PartialEq)]
pub struct PairingResult {
    /// Entrant in the first seat
    pub first: GenomeId,
    /// Entrant in the second seat
    pub second: GenomeId,
    pub result: MatchResult,
}

impl PairingResult {
    /// Tally for one side of the pairing, `None` if `id` did not play
    pub fn tally_for(&self, id: GenomeId) -> Option<Tally> {
        if id == self.first {
            Some(Tally::from_match(&self.result, Seat::First))
        } else if id == self.second {
            Some(Tally::from_match(&self.result, Seat::Second))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TournamentConfig;
    use crate::game_runner::play_genomes;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pairing_tallies_are_complementary() {
        let config = TournamentConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = Genome::random(config.topology.gene_count(), &mut rng);
        let b = Genome::random(config.topology.gene_count(), &mut rng);

        let first = Entrant::new(GenomeId(1), &a);
        let second = Entrant::new(GenomeId(2), &b);
        let pairing = PairingResult {
            first: first.id,
            second: second.id,
            result: play_genomes(first.genome, second.genome, &config, 5).unwrap(),
        };

        let first = pairing.tally_for(GenomeId(1)).unwrap();
        let second = pairing.tally_for(GenomeId(2)).unwrap();
        assert_eq!(first.wins, second.losses);
        assert_eq!(first.losses, second.wins);
        assert_eq!(first.draws, second.draws);
        assert!(first.points == 0 || second.points == 0);
        assert!(pairing.tally_for(GenomeId(3)).is_none());
    }
}
