use serde::Serialize;

/// Which side performed the technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Performed by the trainee.
    #[default]
    Offensive,
    /// Performed against the trainee.
    Defensive,
}

impl Direction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Direction::Offensive => "offensive",
            Direction::Defensive => "defensive",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "offensive" => Some(Direction::Offensive),
            "defensive" => Some(Direction::Defensive),
            _ => None,
        }
    }

    /// Accepts the short CLI spellings too ("off", "def", "o", "d").
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "offensive" | "off" | "o" => Some(Direction::Offensive),
            "defensive" | "def" | "d" => Some(Direction::Defensive),
            _ => None,
        }
    }
}
