pub mod dashboard;
pub mod flow;
pub mod opponents;

use crate::models::round::{Round, RoundResult};
use serde::Serialize;

/// Share of `part` in `total`, 0 when there is nothing to divide.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Win/draw/loss counts over a set of rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultTally {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Rounds finalized without a result.
    pub unrecorded: usize,
}

impl ResultTally {
    pub fn add(&mut self, result: Option<RoundResult>) {
        match result {
            Some(RoundResult::Win) => self.wins += 1,
            Some(RoundResult::Draw) => self.draws += 1,
            Some(RoundResult::Loss) => self.losses += 1,
            None => self.unrecorded += 1,
        }
    }

    pub fn from_rounds<'a>(rounds: impl IntoIterator<Item = &'a Round>) -> Self {
        let mut t = Self::default();
        for r in rounds {
            t.add(r.result);
        }
        t
    }

    pub fn decided(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    /// Ratios over rounds that have a result: (win %, draw %, loss %).
    pub fn ratios(&self) -> (f64, f64, f64) {
        let n = self.decided();
        (
            percent(self.wins, n),
            percent(self.draws, n),
            percent(self.losses, n),
        )
    }
}
