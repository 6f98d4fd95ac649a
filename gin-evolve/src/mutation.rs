//! Mutation operator for genomes
//!
//! Additive Gaussian noise applied independently per gene.

use gin_core::Genome;
use rand::Rng;
use rand_distr::StandardNormal;

// ============================================================================
// Constants
// ============================================================================

/// Per-gene mutation probability when none is given
pub const DEFAULT_MUTATION_PROBABILITY: f64 = 0.001;

/// Per-gene mutation probability applied to every newborn offspring
pub const OFFSPRING_MUTATION_PROBABILITY: f64 = 0.075;

/// Standard deviation of the noise added to a mutated gene
pub const MUTATION_SIGMA: f64 = 0.5;

/// Mutate in place: each gene, with `probability`, gets `N(0, 0.5)` added.
///
/// Returns the number of genes changed.
pub fn mutate<R: Rng + ?Sized>(genome: &mut Genome, probability: f64, rng: &mut R) -> usize {
    let mut changed = 0;
    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < probability {
            let noise: f64 = rng.sample(StandardNormal);
            *gene += MUTATION_SIGMA * noise;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_probability_changes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut genome = Genome::random(500, &mut rng);
        let before = genome.genes().to_vec();

        assert_eq!(mutate(&mut genome, 0.0, &mut rng), 0);
        assert_eq!(genome.genes(), &before[..]);
    }

    #[test]
    fn test_certain_mutation_changes_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut genome = Genome::new(vec![0.0; 300]).unwrap();

        assert_eq!(mutate(&mut genome, 1.0, &mut rng), 300);
        assert!(genome.genes().iter().all(|&g| g != 0.0));

        // noise should have roughly the configured spread
        let var = genome.genes().iter().map(|g| g * g).sum::<f64>() / 300.0;
        assert!((var.sqrt() - MUTATION_SIGMA).abs() < 0.1, "sigma {}", var.sqrt());
    }

    #[test]
    fn test_offspring_rate_is_approximate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut genome = Genome::new(vec![0.0; 10_000]).unwrap();

        let changed = mutate(&mut genome, OFFSPRING_MUTATION_PROBABILITY, &mut rng);
        assert!((600..900).contains(&changed), "changed {}", changed);
    }
}
