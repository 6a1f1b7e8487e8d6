use super::category::Category;
use serde::Serialize;

/// Class content practiced during a session (not a sparring event).
#[derive(Debug, Clone, Serialize)]
pub struct TechniqueDrilled {
    pub id: i64,
    pub session_id: i64,
    pub category: Category,
    pub name: String,
    pub curriculum_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrilled {
    pub category: Category,
    pub name: String,
    pub curriculum_id: Option<i64>,
}
