use serde::Serialize;

/// One session per row.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub id: i64,
    pub date: String,
    pub start: String,
    pub end: Option<String>,
    pub session_type: String,
    pub minutes: Option<i64>,
    pub rounds: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub energy: Option<u8>,
    pub note: Option<String>,
}

/// One logged technique per row, with its round context.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EventExport {
    pub session_id: i64,
    pub date: String,
    pub round: i64,
    pub opponent: String,
    pub result: Option<String>,
    pub category: String,
    pub direction: String,
    pub technique: String,
    pub position: Option<String>,
}
