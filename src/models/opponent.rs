use super::belt::Belt;
use serde::Serialize;

/// Who the trainee rolled with in a round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Opponent {
    Member {
        member_id: i64,
    },
    Guest {
        name: String,
        belt: Option<Belt>,
    },
    #[default]
    Solo,
}

impl Opponent {
    /// Split into the three nullable store columns
    /// (opponent_member_id, guest_name, guest_belt).
    pub fn to_columns(&self) -> (Option<i64>, Option<String>, Option<&'static str>) {
        match self {
            Opponent::Member { member_id } => (Some(*member_id), None, None),
            Opponent::Guest { name, belt } => {
                (None, Some(name.clone()), belt.as_ref().map(|b| b.to_db_str()))
            }
            Opponent::Solo => (None, None, None),
        }
    }

    pub fn from_columns(
        member_id: Option<i64>,
        guest_name: Option<String>,
        guest_belt: Option<String>,
    ) -> Self {
        match (member_id, guest_name) {
            (Some(id), _) => Opponent::Member { member_id: id },
            (None, Some(name)) if !name.trim().is_empty() => Opponent::Guest {
                name,
                belt: guest_belt.as_deref().and_then(Belt::from_db_str),
            },
            _ => Opponent::Solo,
        }
    }

    pub fn is_solo(&self) -> bool {
        matches!(self, Opponent::Solo)
    }
}
