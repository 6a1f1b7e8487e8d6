use super::ResultTally;
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::event::RoundEvent;
use crate::models::round::Round;
use crate::models::session::Session;
use crate::models::session_type::SessionType;
use chrono::{Datelike, Local};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueCount {
    pub category: Category,
    pub technique: String,
    pub offensive: usize,
    pub defensive: usize,
}

impl TechniqueCount {
    pub fn total(&self) -> usize {
        self.offensive + self.defensive
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// "YYYY-MM", local time.
    pub month: String,
    pub sessions: usize,
    pub minutes: i64,
    /// Sessions compared to the previous calendar month.
    pub change: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub sessions: usize,
    pub total_minutes: i64,
    pub avg_session_minutes: f64,
    pub rounds: usize,
    pub total_round_secs: i64,
    pub avg_round_secs: f64,
    pub avg_energy: Option<f64>,
    pub by_type: Vec<(SessionType, usize)>,
    /// Monday first.
    pub weekdays: [usize; 7],
    pub months: Vec<MonthBucket>,
    pub techniques: Vec<TechniqueCount>,
    pub results: ResultTally,
}

/// Reduce already-filtered rows into the dashboard numbers. Open sessions and
/// open rounds count as visits but add no duration.
pub fn build_dashboard(sessions: &[Session], rounds: &[Round], events: &[RoundEvent]) -> Dashboard {
    let mut d = Dashboard {
        sessions: sessions.len(),
        by_type: SessionType::ALL.iter().map(|t| (*t, 0)).collect(),
        ..Default::default()
    };

    // sessions
    let mut closed = 0usize;
    let mut energy_sum = 0u32;
    let mut energy_n = 0u32;
    let mut months: BTreeMap<(i32, u32), (usize, i64)> = BTreeMap::new();

    for s in sessions {
        let minutes = s.duration_minutes().unwrap_or(0);
        if s.ended_at.is_some() {
            closed += 1;
            d.total_minutes += minutes;
        }
        if let Some(e) = s.energy {
            energy_sum += u32::from(e);
            energy_n += 1;
        }
        if let Some(slot) = d.by_type.iter_mut().find(|(t, _)| *t == s.session_type) {
            slot.1 += 1;
        }

        let local = s.started_at.with_timezone(&Local);
        d.weekdays[local.weekday().num_days_from_monday() as usize] += 1;

        let bucket = months.entry((local.year(), local.month())).or_default();
        bucket.0 += 1;
        bucket.1 += minutes;
    }

    if closed > 0 {
        d.avg_session_minutes = d.total_minutes as f64 / closed as f64;
    }
    if energy_n > 0 {
        d.avg_energy = Some(f64::from(energy_sum) / f64::from(energy_n));
    }

    // calendar months from the first to the last one seen, gaps as zero rows
    if let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) {
        let mut prev: Option<usize> = None;
        let (mut y, mut m) = first;
        while (y, m) <= last {
            let (n, minutes) = months.get(&(y, m)).copied().unwrap_or_default();
            d.months.push(MonthBucket {
                month: format!("{:04}-{:02}", y, m),
                sessions: n,
                minutes,
                change: prev.map(|p| n as i64 - p as i64),
            });
            prev = Some(n);
            (y, m) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
        }
    }

    // rounds
    let finalized: Vec<&Round> = rounds.iter().filter(|r| !r.is_open()).collect();
    d.rounds = finalized.len();
    d.total_round_secs = finalized.iter().filter_map(|r| r.duration_secs).sum();
    if d.rounds > 0 {
        d.avg_round_secs = d.total_round_secs as f64 / d.rounds as f64;
    }
    d.results = ResultTally::from_rounds(finalized);

    d.techniques = technique_counts(events);
    d
}

/// Offensive/defensive counts per (category, technique), most frequent first.
pub fn technique_counts(events: &[RoundEvent]) -> Vec<TechniqueCount> {
    let mut map: BTreeMap<(Category, String), (usize, usize)> = BTreeMap::new();

    for e in events {
        let slot = map
            .entry((e.tag.category.clone(), e.tag.technique.clone()))
            .or_default();
        match e.tag.direction {
            Direction::Offensive => slot.0 += 1,
            Direction::Defensive => slot.1 += 1,
        }
    }

    let mut out: Vec<TechniqueCount> = map
        .into_iter()
        .map(|((category, technique), (offensive, defensive))| TechniqueCount {
            category,
            technique,
            offensive,
            defensive,
        })
        .collect();

    // stable: ties keep category/technique order
    out.sort_by(|a, b| b.total().cmp(&a.total()));
    out
}
