use super::opponent::Opponent;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Draw,
    Loss,
}

impl RoundResult {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RoundResult::Win => "win",
            RoundResult::Draw => "draw",
            RoundResult::Loss => "loss",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "win" | "w" => Some(RoundResult::Win),
            "draw" | "d" => Some(RoundResult::Draw),
            "loss" | "l" => Some(RoundResult::Loss),
            _ => None,
        }
    }
}

/// One timed sparring interval inside a session.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub id: i64,
    pub session_id: i64,
    pub seq: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub opponent: Opponent,
    pub result: Option<RoundResult>,
    /// Derived by the store from the two timestamps.
    pub duration_secs: Option<i64>,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}
