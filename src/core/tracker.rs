use crate::core::gym::Roster;
use crate::core::tagger::TaggingPolicy;
use crate::errors::{AppError, AppResult};
use crate::models::belt::Belt;
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::event::EventTag;
use crate::models::opponent::Opponent;

/// Result of tapping a technique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Appended to the buffer at this index.
    Logged(usize),
    /// Position-relevant category: nothing appended until the position is
    /// confirmed or skipped.
    AwaitingPosition,
}

/// How the user picked an opponent, before resolution against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpponentSelection {
    Member(i64),
    Contact(i64),
    Guest { name: String, belt: Option<Belt> },
    None,
}

#[derive(Debug, Clone)]
struct PendingTap {
    category: Category,
    technique: String,
    direction: Direction,
}

/// In-memory buffer for the round being logged.
///
/// Nothing here touches the store: the buffer is committed by the lifecycle
/// controller when the round ends, or dropped with the tracker.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    policy: TaggingPolicy,
    direction: Direction,
    events: Vec<EventTag>,
    awaiting: Option<PendingTap>,
    opponent: Opponent,
}

impl Default for RoundTracker {
    fn default() -> Self {
        Self::new(TaggingPolicy::live())
    }
}

impl RoundTracker {
    pub fn new(policy: TaggingPolicy) -> Self {
        Self {
            policy,
            direction: Direction::Offensive,
            events: Vec::new(),
            awaiting: None,
            opponent: Opponent::Solo,
        }
    }

    pub fn policy(&self) -> &TaggingPolicy {
        &self.policy
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tap_technique(&mut self, category: Category, technique: &str) -> AppResult<TapOutcome> {
        if self.awaiting.is_some() {
            return Err(AppError::InvalidState(
                "A position is pending: confirm or skip it first.".into(),
            ));
        }

        // validate now, the position comes later
        let tag = self
            .policy
            .tag(category, technique, self.direction, None)?;

        if self.policy.prompts_position(&tag.category) {
            self.awaiting = Some(PendingTap {
                category: tag.category,
                technique: tag.technique,
                direction: tag.direction,
            });
            return Ok(TapOutcome::AwaitingPosition);
        }

        self.events.push(tag);
        Ok(TapOutcome::Logged(self.events.len() - 1))
    }

    pub fn is_awaiting_position(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn confirm_position(&mut self, position: &str) -> AppResult<usize> {
        self.resolve_pending(Some(position))
    }

    pub fn skip_position(&mut self) -> AppResult<usize> {
        self.resolve_pending(None)
    }

    fn resolve_pending(&mut self, position: Option<&str>) -> AppResult<usize> {
        let pending = self
            .awaiting
            .take()
            .ok_or_else(|| AppError::InvalidState("No technique is waiting for a position.".into()))?;

        let tag = self.policy.tag(
            pending.category,
            &pending.technique,
            pending.direction,
            position,
        )?;
        self.events.push(tag);
        Ok(self.events.len() - 1)
    }

    /// Correct a mis-tap before committing.
    pub fn remove_event(&mut self, index: usize) -> AppResult<EventTag> {
        if index >= self.events.len() {
            return Err(AppError::Validation(format!(
                "No event #{} in this round ({} logged).",
                index + 1,
                self.events.len()
            )));
        }
        Ok(self.events.remove(index))
    }

    /// Resolve the selection against the roster snapshot loaded for this screen.
    pub fn set_opponent(&mut self, selection: OpponentSelection, roster: &Roster) -> AppResult<&Opponent> {
        self.opponent = match selection {
            OpponentSelection::Member(id) => {
                let m = roster.member(id).ok_or_else(|| {
                    AppError::NotFound(format!("Member #{} is not on this gym's roster.", id))
                })?;
                Opponent::Member { member_id: m.id }
            }
            OpponentSelection::Contact(id) => {
                let c = roster.contact(id).ok_or_else(|| {
                    AppError::NotFound(format!("Contact #{} is not on this gym's roster.", id))
                })?;
                Opponent::Guest {
                    name: c.name.clone(),
                    belt: c.belt,
                }
            }
            OpponentSelection::Guest { name, belt } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(AppError::Validation("Guest name cannot be empty.".into()));
                }
                Opponent::Guest { name, belt }
            }
            OpponentSelection::None => Opponent::Solo,
        };
        Ok(&self.opponent)
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn events(&self) -> &[EventTag] {
        &self.events
    }

    /// Empty the tracker for the next round. The policy is kept, the direction
    /// toggle goes back to offensive.
    pub fn reset(&mut self) {
        self.direction = Direction::Offensive;
        self.events.clear();
        self.awaiting = None;
        self.opponent = Opponent::Solo;
    }
}
