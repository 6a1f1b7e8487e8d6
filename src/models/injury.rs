use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Some(Severity::Mild),
            "moderate" => Some(Severity::Moderate),
            "severe" => Some(Severity::Severe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Injury {
    pub id: i64,
    pub trainee_id: i64,
    pub session_id: Option<i64>,
    pub body_part: String,
    pub injury_type: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>, // NULL = active
}

/// Injury waiting in the check-out buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInjury {
    pub body_part: String,
    pub injury_type: String,
    pub severity: Severity,
}
