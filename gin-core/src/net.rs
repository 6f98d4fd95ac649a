//! Feed-forward predictor parameterised by a genome

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::Genome;
use crate::observe::{HAND_SLOTS, TABLE_SLOTS};

/// Maps an observation vector to output activations
pub trait Predictor: Send {
    fn predict(&self, inputs: &[f64]) -> Vec<f64>;
}

/// Layer sizes of the predictor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Topology {
    pub const fn new(inputs: usize, hidden: usize, outputs: usize) -> Self {
        Self {
            inputs,
            hidden,
            outputs,
        }
    }

    /// Hand slots plus table slots in, three decisions out, hidden width at
    /// two thirds of inputs + outputs
    pub const fn gin() -> Self {
        let inputs = HAND_SLOTS + TABLE_SLOTS;
        let outputs = 3;
        Self::new(inputs, (inputs + outputs) * 2 / 3, outputs)
    }

    /// Number of genes needed to parameterise this topology
    pub const fn gene_count(&self) -> usize {
        self.inputs
            + self.hidden * self.inputs
            + self.hidden * self.hidden
            + self.outputs * self.hidden
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::gin()
    }
}

/// Two tanh hidden layers behind a per-input scale, logistic outputs.
///
/// Gene layout: input scales, input->hidden, hidden->hidden, hidden->output,
/// each weight matrix row-major by destination neuron.
#[derive(Clone, Debug)]
pub struct FeedForward {
    topology: Topology,
    weights: Vec<f64>,
}

impl FeedForward {
    pub fn new(topology: Topology, genome: &Genome) -> Result<Self, GenomeError> {
        let expected = topology.gene_count();
        if genome.len() != expected {
            return Err(GenomeError::LengthMismatch {
                expected,
                actual: genome.len(),
            });
        }
        Ok(Self {
            topology,
            weights: genome.genes().to_vec(),
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }
}

impl Predictor for FeedForward {
    fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        let Topology {
            inputs: n_in,
            hidden,
            outputs,
        } = self.topology;

        let (scales, rest) = self.weights.split_at(n_in);
        let (w1, rest) = rest.split_at(hidden * n_in);
        let (w2, w3) = rest.split_at(hidden * hidden);

        let scaled: Vec<f64> = (0..n_in)
            .map(|i| inputs.get(i).copied().unwrap_or(0.0) * scales[i])
            .collect();
        let h1 = layer(w1, &scaled, hidden, f64::tanh);
        let h2 = layer(w2, &h1, hidden, f64::tanh);
        layer(w3, &h2, outputs, logistic)
    }
}

fn layer(weights: &[f64], input: &[f64], width: usize, activation: fn(f64) -> f64) -> Vec<f64> {
    weights
        .chunks(input.len().max(1))
        .take(width)
        .map(|row| activation(row.iter().zip(input).map(|(w, x)| w * x).sum()))
        .collect()
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_gin_topology_gene_count() {
        let t = Topology::gin();
        assert_eq!(t.inputs, 44);
        assert_eq!(t.hidden, 31);
        assert_eq!(t.outputs, 3);
        assert_eq!(t.gene_count(), 44 + 31 * 44 + 31 * 31 + 3 * 31);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let genome = Genome::new(vec![0.0; 10]).unwrap();
        let err = FeedForward::new(Topology::new(2, 2, 1), &genome).unwrap_err();
        assert_eq!(
            err,
            GenomeError::LengthMismatch {
                expected: 12,
                actual: 10
            }
        );
    }

    #[test]
    fn test_zero_weights_give_half_outputs() {
        let t = Topology::new(3, 2, 2);
        let genome = Genome::new(vec![0.0; t.gene_count()]).unwrap();
        let net = FeedForward::new(t, &genome).unwrap();
        let out = net.predict(&[1.0, 2.0, 3.0]);
        assert_eq!(out.len(), 2);
        for o in out {
            assert!((o - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_outputs_in_unit_interval() {
        let t = Topology::gin();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let net = FeedForward::new(t, &Genome::random(t.gene_count(), &mut rng)).unwrap();
        let inputs: Vec<f64> = (0..t.inputs).map(|i| i as f64 / 52.0).collect();
        let out = net.predict(&inputs);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|o| (0.0..=1.0).contains(o)));
    }

    #[test]
    fn test_hand_computed_single_path() {
        // 1 input, 1 hidden, 1 output: out = logistic(w3 * tanh(w2 * tanh(w1 * s * x)))
        let t = Topology::new(1, 1, 1);
        let genome = Genome::new(vec![2.0, 0.5, 1.0, 3.0]).unwrap();
        let net = FeedForward::new(t, &genome).unwrap();
        let expected = logistic(3.0 * (1.0 * (0.5f64 * 2.0 * 0.4).tanh()).tanh());
        assert!((net.predict(&[0.4])[0] - expected).abs() < 1e-12);
    }
}
