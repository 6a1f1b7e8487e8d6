use super::belt::Belt;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub belt: Belt,
    pub stripes: i64,
}

/// Training partner without an account, kept by the gym owner.
#[derive(Debug, Clone, Serialize)]
pub struct OfflineContact {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub belt: Option<Belt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterKind {
    Registered,
    Offline,
}

/// One row of the roster snapshot (members ∪ offline contacts).
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub kind: RosterKind,
    pub id: i64,
    pub name: String,
    pub belt: Option<Belt>,
    pub stripes: i64,
}
