use super::session_type::SessionType;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

/// One visit to the gym (`checkins` table).
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub trainee_id: i64,
    pub gym_id: i64,
    pub session_type: SessionType,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>, // NULL while checked in
    pub energy: Option<u8>,              // 1..=5
    pub note: Option<String>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Calendar day of the visit, in local time.
    pub fn local_date(&self) -> NaiveDate {
        self.started_at.with_timezone(&Local).date_naive()
    }

    /// Minutes between check-in and check-out; `None` while still open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.ended_at.map(|end| (end - self.started_at).num_minutes())
    }
}

/// Optional fields captured at check-out.
#[derive(Debug, Clone, Default)]
pub struct Debrief {
    pub energy: Option<u8>,
    pub note: Option<String>,
    pub injuries: Vec<super::injury::NewInjury>,
    pub drilled: Vec<super::drilled::NewDrilled>,
}
