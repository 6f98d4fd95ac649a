//! Ranking and survivor selection
//!
//! Members are ranked by a score that rewards both the rate at which they
//! collect points and how often they win.

use crate::record::GenomeRecord;

/// Ranking score of a record at generation `generation`.
///
/// `(points per generation + points per win) * 100 * winrate`
pub fn ranking_score(record: &GenomeRecord, generation: u32) -> f64 {
    let points = record.points_per_generation(generation) + record.points_per_win();
    points * (100.0 * record.winrate())
}

/// Select the top N individuals by fitness (elitism).
///
/// Returns indices of the best individuals, sorted by fitness (descending).
/// The sort is stable, so equal scores keep their input order.
///
/// # Arguments
/// * `fitness` - Fitness scores
/// * `n` - Number of elite individuals to select
pub fn select_elite(fitness: &[f64], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitness.len()).collect();
    indices.sort_by(|&a, &b| {
        fitness[b].partial_cmp(&fitness[a]).unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(n);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_score_formula() {
        let record = GenomeRecord {
            wins: 2,
            draws: 1,
            losses: 1,
            points: 40,
            generation: 3,
            mutation_depth: 0,
        };
        // age 2 -> 20 per generation, 20 per win, winrate 0.625
        let score = ranking_score(&record, 4);
        assert!((score - 40.0 * 62.5).abs() < 1e-9, "score {}", score);
    }

    #[test]
    fn test_score_never_falls_as_winrate_rises() {
        for wins in [0, 2, 7] {
            let mut rows: Vec<(f64, f64)> = Vec::new();
            for draws in 0..6 {
                for losses in 0..6 {
                    let record = GenomeRecord {
                        wins,
                        draws,
                        losses,
                        points: 40,
                        generation: 1,
                        mutation_depth: 0,
                    };
                    rows.push((record.winrate(), ranking_score(&record, 5)));
                }
            }
            rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

            for pair in rows.windows(2) {
                let ((lo_rate, lo_score), (hi_rate, hi_score)) = (pair[0], pair[1]);
                assert!(
                    hi_score >= lo_score - 1e-9,
                    "wins {}: winrate {} scored {} but winrate {} scored {}",
                    wins,
                    lo_rate,
                    lo_score,
                    hi_rate,
                    hi_score
                );
            }
        }
    }

    #[test]
    fn test_no_games_scores_zero() {
        let record = GenomeRecord::new(0, 0);
        assert_eq!(ranking_score(&record, 10), 0.0);
    }

    #[test]
    fn test_select_elite() {
        let fitness = vec![0.5, 0.9, 0.3, 0.7, 0.1];
        let elite = select_elite(&fitness, 3);

        assert_eq!(elite.len(), 3);
        assert_eq!(elite[0], 1); // 0.9
        assert_eq!(elite[1], 3); // 0.7
        assert_eq!(elite[2], 0); // 0.5
    }

    #[test]
    fn test_select_elite_keeps_tie_order() {
        let fitness = vec![1.0, 2.0, 1.0, 2.0, 1.0];
        assert_eq!(select_elite(&fitness, 4), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_select_elite_handles_small_pop() {
        let fitness = vec![0.5, 0.9];
        let elite = select_elite(&fitness, 5);

        assert_eq!(elite.len(), 2); // Can't select more than population
    }
}
