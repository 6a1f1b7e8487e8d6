use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WeightEntry {
    pub id: i64,
    pub trainee_id: i64,
    pub date: NaiveDate,
    pub kg: f64,
}
