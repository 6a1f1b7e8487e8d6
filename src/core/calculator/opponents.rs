use super::ResultTally;
use crate::core::gym::Roster;
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::event::RoundEvent;
use crate::models::opponent::Opponent;
use crate::models::round::Round;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum OpponentKey {
    Member(i64),
    /// Guests are grouped by lower-cased name.
    Guest(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentStats {
    pub key: OpponentKey,
    pub label: String,
    pub rounds: usize,
    pub results: ResultTally,
    pub submissions_for: usize,
    pub submissions_against: usize,
}

/// Per-opponent record over finalized rounds. Solo rounds are left out;
/// member names come from the roster snapshot, unknown ids get a placeholder.
pub fn opponent_stats(rounds: &[Round], events: &[RoundEvent], roster: &Roster) -> Vec<OpponentStats> {
    let mut subs: HashMap<i64, (usize, usize)> = HashMap::new();
    for e in events.iter().filter(|e| e.tag.category == Category::Submission) {
        let slot = subs.entry(e.round_id).or_default();
        match e.tag.direction {
            Direction::Offensive => slot.0 += 1,
            Direction::Defensive => slot.1 += 1,
        }
    }

    let mut map: BTreeMap<OpponentKey, OpponentStats> = BTreeMap::new();

    for r in rounds.iter().filter(|r| !r.is_open()) {
        let (key, label) = match &r.opponent {
            Opponent::Member { member_id } => (
                OpponentKey::Member(*member_id),
                roster
                    .member_name(*member_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Member #{}", member_id)),
            ),
            Opponent::Guest { name, .. } => (OpponentKey::Guest(name.trim().to_lowercase()), name.trim().to_string()),
            Opponent::Solo => continue,
        };

        let entry = map.entry(key.clone()).or_insert_with(|| OpponentStats {
            key,
            label,
            rounds: 0,
            results: ResultTally::default(),
            submissions_for: 0,
            submissions_against: 0,
        });
        entry.rounds += 1;
        entry.results.add(r.result);
        if let Some((f, a)) = subs.get(&r.id) {
            entry.submissions_for += f;
            entry.submissions_against += a;
        }
    }

    let mut out: Vec<OpponentStats> = map.into_values().collect();
    out.sort_by(|a, b| b.rounds.cmp(&a.rounds).then_with(|| a.label.cmp(&b.label)));
    out
}
