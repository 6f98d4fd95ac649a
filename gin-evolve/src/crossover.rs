//! Crossover operator for genomes
//!
//! Combines two parent genomes into an offspring that inherits each gene
//! from one parent or the other.

use gin_core::Genome;
use rand::Rng;

/// Uniform crossover.
///
/// The child is as long as the longer parent. Each position both parents
/// share is taken from either parent with equal probability; the tail beyond
/// the shorter parent is copied from the longer one.
///
/// # Arguments
/// * `a` - First parent
/// * `b` - Second parent
/// * `rng` - Random number generator
pub fn cross<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut child = long.clone();
    for (gene, &other) in child.genes_mut().iter_mut().zip(short.genes()) {
        if rng.gen_bool(0.5) {
            *gene = other;
        }
    }
    child
}
