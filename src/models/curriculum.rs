use super::category::Category;
use chrono::NaiveDate;
use serde::Serialize;

/// What the coach posted for a given class day.
#[derive(Debug, Clone, Serialize)]
pub struct CurriculumPost {
    pub id: i64,
    pub gym_id: i64,
    pub date: NaiveDate,
    pub title: String,
    pub notes: Option<String>,
    pub techniques: Vec<CurriculumTechnique>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurriculumTechnique {
    pub category: Category,
    pub name: String,
}
