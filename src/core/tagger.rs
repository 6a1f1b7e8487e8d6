//! Shared capture policy for technique events.
//!
//! The same policy object is used for live rounds, edits of historical rounds
//! and backfilled rounds; only the category alphabet differs per call site.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::event::EventTag;

/// A category offered at a call site, with its convenience vocabulary.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub category: Category,
    /// Ask "from which position" after a tap.
    pub prompts_position: bool,
    pub techniques: &'static [&'static str],
}

pub const SUBMISSIONS: &[&str] = &[
    "Armbar",
    "Triangle",
    "Rear naked choke",
    "Kimura",
    "Americana",
    "Guillotine",
    "Cross collar choke",
    "Bow and arrow",
    "Omoplata",
    "Heel hook",
    "Straight ankle lock",
    "Darce",
    "Arm triangle",
    "Ezekiel",
];

pub const SWEEPS: &[&str] = &[
    "Scissor sweep",
    "Hip bump",
    "Flower sweep",
    "Butterfly sweep",
    "X-guard sweep",
    "Tripod sweep",
    "Berimbolo",
    "Old school sweep",
];

pub const TAKEDOWNS: &[&str] = &[
    "Double leg",
    "Single leg",
    "Osoto gari",
    "Uchi mata",
    "Seoi nage",
    "Ankle pick",
    "Guard pull",
];

pub const PASSES: &[&str] = &[
    "Toreando",
    "Knee slice",
    "Over-under",
    "Leg drag",
    "Stack pass",
    "Smash pass",
];

pub const ESCAPES: &[&str] = &[
    "Bridge and roll",
    "Elbow-knee escape",
    "Back escape",
    "Side control escape",
    "Submission escape",
];

pub const POSITIONS: &[&str] = &[
    "Closed guard",
    "Half guard",
    "Open guard",
    "Butterfly guard",
    "De la Riva",
    "Mount",
    "Side control",
    "Back",
    "North-south",
    "Knee on belly",
    "Turtle",
    "Standing",
];

/// Tagging policy for one call site.
#[derive(Debug, Clone)]
pub struct TaggingPolicy {
    categories: Vec<CategorySpec>,
}

impl TaggingPolicy {
    fn spec(category: Category, prompts_position: bool, techniques: &'static [&'static str]) -> CategorySpec {
        CategorySpec {
            category,
            prompts_position,
            techniques,
        }
    }

    /// Live rounds: the full alphabet.
    pub fn live() -> Self {
        Self {
            categories: vec![
                Self::spec(Category::Submission, true, SUBMISSIONS),
                Self::spec(Category::Sweep, true, SWEEPS),
                Self::spec(Category::Takedown, false, TAKEDOWNS),
                Self::spec(Category::Pass, false, PASSES),
                Self::spec(Category::Escape, false, ESCAPES),
            ],
        }
    }

    /// Edits of an existing round.
    pub fn history() -> Self {
        Self::live()
    }

    /// Rounds appended to a past session: the minimal alphabet.
    pub fn backfill() -> Self {
        Self {
            categories: vec![
                Self::spec(Category::Submission, true, SUBMISSIONS),
                Self::spec(Category::Sweep, true, SWEEPS),
                Self::spec(Category::Takedown, false, TAKEDOWNS),
            ],
        }
    }

    pub fn categories(&self) -> &[CategorySpec] {
        &self.categories
    }

    /// Categories outside the call-site alphabet are accepted as free-text "other"
    /// and never prompt for a position.
    pub fn prompts_position(&self, category: &Category) -> bool {
        self.categories
            .iter()
            .find(|s| &s.category == category)
            .is_some_and(|s| s.prompts_position)
    }

    /// Convenience list for a category; empty for "other".
    pub fn suggestions(&self, category: &Category) -> &'static [&'static str] {
        self.categories
            .iter()
            .find(|s| &s.category == category)
            .map(|s| s.techniques)
            .unwrap_or(&[])
    }

    /// Build an event, normalizing free text. Technique names outside the
    /// suggestion list are fine; an empty one is not.
    pub fn tag(
        &self,
        category: Category,
        technique: &str,
        direction: Direction,
        position: Option<&str>,
    ) -> AppResult<EventTag> {
        let technique = technique.trim();
        if technique.is_empty() {
            return Err(AppError::Validation("Technique name cannot be empty.".into()));
        }

        // free-text labels get the same normal form the store reads back
        let category = match category {
            Category::Other(label) => Category::parse(&label),
            c => c,
        };

        let position = position
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(EventTag::new(category, direction, technique, position))
    }
}

/// Parse the compact CLI form `direction:category:technique[@position]`,
/// e.g. `off:submission:Armbar@Closed guard` or `def:other:Wrist lock`.
pub fn parse_event_spec(spec: &str) -> AppResult<(Direction, Category, String, Option<String>)> {
    let (body, position) = match spec.split_once('@') {
        Some((b, p)) => (b, Some(p.trim().to_string()).filter(|p| !p.is_empty())),
        None => (spec, None),
    };

    let mut parts = body.splitn(3, ':');
    let (Some(dir), Some(cat), Some(tech)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::Validation(format!(
            "Invalid event '{}': expected direction:category:technique[@position]",
            spec
        )));
    };

    let direction = Direction::from_code(dir).ok_or_else(|| {
        AppError::Validation(format!("Invalid direction '{}': use off or def", dir))
    })?;

    Ok((direction, Category::parse(cat), tech.trim().to_string(), position))
}
