//! Per-genome tallies accumulated over a tournament
//!
//! Level 3 - Step-level implementation

use gin_core::{MatchResult, Seat};

/// Results credited to one genome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Sum over matches of how far this genome outscored its opponent
    pub points: u64,
}

impl Tally {
    /// What one seat earned from a match. Points are the score margin over
    /// the opponent, never negative.
    pub fn from_match(result: &MatchResult, seat: Seat) -> Self {
        let own = result.record(seat);
        let other = result.record(seat.opponent());
        Self {
            wins: own.wins,
            draws: own.draws,
            losses: own.losses,
            points: u64::from(own.score.saturating_sub(other.score)),
        }
    }

    /// Add another tally into this one
    pub fn absorb(&mut self, other: &Tally) {
        self.wins += other.wins;
        self.draws += other.draws;
        self.losses += other.losses;
        self.points += other.points;
    }

    /// Total hands decided
    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gin_core::{HandOutcome, SeatRecord};

    fn knock_result() -> MatchResult {
        MatchResult {
            first: SeatRecord { score: 5, wins: 1, losses: 0, draws: 0 },
            second: SeatRecord { score: 0, wins: 0, losses: 1, draws: 0 },
            hands: vec![HandOutcome::Knock { knocker: Seat::First, points: 5 }],
        }
    }

    #[test]
    fn test_points_are_positive_margin() {
        let result = knock_result();
        let winner = Tally::from_match(&result, Seat::First);
        let loser = Tally::from_match(&result, Seat::Second);

        assert_eq!(winner, Tally { wins: 1, draws: 0, losses: 0, points: 5 });
        assert_eq!(loser, Tally { wins: 0, draws: 0, losses: 1, points: 0 });
    }

    #[test]
    fn test_absorb_sums_fields() {
        let mut total = Tally::default();
        total.absorb(&Tally { wins: 1, draws: 0, losses: 2, points: 30 });
        total.absorb(&Tally { wins: 0, draws: 1, losses: 0, points: 0 });
        assert_eq!(total, Tally { wins: 1, draws: 1, losses: 2, points: 30 });
        assert_eq!(total.games(), 4);
    }
}
