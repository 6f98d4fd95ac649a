//! Genome - the evolvable parameter vector behind a strategy

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GenomeError;

/// Unique handle of an individual within a population.
///
/// Individuals are tracked by identity: two genomes with identical genes are
/// still different individuals with different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomeId(pub u64);

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-length vector of real-valued genes.
///
/// Intentionally not `PartialEq`: compare `genes()` when the values matter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Genome {
    genes: Vec<f64>,
}

impl Genome {
    /// Genes drawn i.i.d. from N(0, 1)
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let genes = (0..size).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        Self { genes }
    }

    /// Wrap explicit gene values; every value must be finite
    pub fn new(genes: Vec<f64>) -> Result<Self, GenomeError> {
        if let Some(index) = genes.iter().position(|g| !g.is_finite()) {
            return Err(GenomeError::InvalidGenome {
                index,
                value: genes[index],
            });
        }
        Ok(Self { genes })
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl TryFrom<Vec<f64>> for Genome {
    type Error = GenomeError;

    fn try_from(genes: Vec<f64>) -> Result<Self, Self::Error> {
        Genome::new(genes)
    }
}

impl From<Genome> for Vec<f64> {
    fn from(genome: Genome) -> Self {
        genome.genes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_genome_length_and_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let genome = Genome::random(5000, &mut rng);
        assert_eq!(genome.len(), 5000);

        let mean = genome.genes().iter().sum::<f64>() / 5000.0;
        let var = genome.genes().iter().map(|g| (g - mean).powi(2)).sum::<f64>() / 5000.0;
        assert!(mean.abs() < 0.1, "mean {} too far from 0", mean);
        assert!((var - 1.0).abs() < 0.15, "variance {} too far from 1", var);
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(Genome::new(vec![0.5, -1.25]).is_ok());

        let err = Genome::new(vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, GenomeError::InvalidGenome { index: 1, .. }));

        assert!(Genome::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let genome = Genome::new(vec![1.5, -0.25, 3.0]).unwrap();
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(json, "[1.5,-0.25,3.0]");

        let back: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.genes(), genome.genes());
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(GenomeId(7).to_string(), "#7");
        assert!(GenomeId(1) < GenomeId(2));
    }
}
