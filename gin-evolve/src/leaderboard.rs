//! Per-generation leaderboard
//!
//! Built after a generation's tournament, before culling, so every member
//! that played appears.

use gin_core::GenomeId;
use serde::{Deserialize, Serialize};

use crate::record::GenomeRecord;
use crate::selection::ranking_score;

/// One ranked row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub id: GenomeId,
    pub score: f64,
    pub winrate: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u64,
    pub age: u32,
    pub mutation_depth: u32,
}

/// Best values seen in a generation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub max_score: f64,
    pub max_winrate: f64,
    pub max_age: u32,
}

impl GenerationSummary {
    /// `generation,max_score,max_winrate,max_age`
    pub fn tally_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.generation, self.max_score, self.max_winrate, self.max_age
        )
    }
}

/// Ranked view of a population at one generation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub generation: u32,
    /// Ordered by descending ranking score, the order culling uses, rather
    /// than by winrate; ties keep population order
    pub entries: Vec<LeaderboardEntry>,
    pub summary: GenerationSummary,
}

impl Leaderboard {
    /// Rank `members`, given in population order
    pub fn build<'a>(
        generation: u32,
        members: impl IntoIterator<Item = (GenomeId, &'a GenomeRecord)>,
    ) -> Self {
        let mut entries: Vec<LeaderboardEntry> = members
            .into_iter()
            .map(|(id, record)| LeaderboardEntry {
                rank: 0,
                id,
                score: ranking_score(record, generation),
                winrate: record.winrate(),
                wins: record.wins,
                losses: record.losses,
                draws: record.draws,
                points: record.points,
                age: record.age(generation),
                mutation_depth: record.mutation_depth,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        let summary = entries.iter().fold(
            GenerationSummary {
                generation,
                ..GenerationSummary::default()
            },
            |mut s, e| {
                s.max_score = s.max_score.max(e.score);
                s.max_winrate = s.max_winrate.max(e.winrate);
                s.max_age = s.max_age.max(e.age);
                s
            },
        );

        Self {
            generation,
            entries,
            summary,
        }
    }

    /// Top `n` rows
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
