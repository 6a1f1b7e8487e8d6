use super::{category::Category, direction::Direction};
use serde::Serialize;

/// A logged technique occurrence as stored in `round_events`.
#[derive(Debug, Clone, Serialize)]
pub struct RoundEvent {
    pub id: i64,
    pub round_id: i64,
    #[serde(flatten)]
    pub tag: EventTag,
}

/// The content of an event, independent of where it is stored.
///
/// Buffers hold these until a round is committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventTag {
    pub category: Category,
    pub direction: Direction,
    pub technique: String,
    pub position: Option<String>,
}

impl EventTag {
    pub fn new(
        category: Category,
        direction: Direction,
        technique: impl Into<String>,
        position: Option<String>,
    ) -> Self {
        Self {
            category,
            direction,
            technique: technique.into(),
            position,
        }
    }

    pub fn describe(&self) -> String {
        let arrow = match self.direction {
            Direction::Offensive => "→",
            Direction::Defensive => "←",
        };
        match &self.position {
            Some(p) => format!("{} {} {} (from {})", arrow, self.category, self.technique, p),
            None => format!("{} {} {}", arrow, self.category, self.technique),
        }
    }
}
