use crate::db::log::audit;
use crate::db::{members, weights};
use crate::errors::{AppError, AppResult};
use crate::models::belt::{Belt, MAX_STRIPES};
use crate::models::member::Member;
use crate::models::weight::WeightEntry;
use chrono::NaiveDate;
use rusqlite::Connection;

pub struct MemberLogic;

impl MemberLogic {
    pub fn add(conn: &Connection, name: &str, belt: Belt, stripes: i64) -> AppResult<Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Member name cannot be empty.".into()));
        }
        if !(0..=MAX_STRIPES).contains(&stripes) {
            return Err(AppError::Validation(format!(
                "Stripes must be between 0 and {} (got {}).",
                MAX_STRIPES, stripes
            )));
        }

        let id = members::insert_member(conn, name, belt, stripes)?;
        audit(conn, "member_add", &format!("member #{}", id), name);

        Ok(Member {
            id,
            name: name.to_string(),
            belt,
            stripes,
        })
    }
}

pub struct WeightLogic;

impl WeightLogic {
    pub fn add(conn: &Connection, trainee_id: i64, date: NaiveDate, kg: f64) -> AppResult<i64> {
        if !kg.is_finite() || kg <= 0.0 || kg > 400.0 {
            return Err(AppError::Validation(format!("Invalid weight: {} kg", kg)));
        }
        let id = weights::insert_weight(conn, trainee_id, &date, kg)?;
        audit(conn, "weight", &format!("weight #{}", id), &format!("{:.1} kg on {}", kg, date));
        Ok(id)
    }

    /// Entries oldest first, each with the change from the previous one.
    pub fn history(conn: &Connection, trainee_id: i64) -> AppResult<Vec<(WeightEntry, Option<f64>)>> {
        let list = weights::list_weights(conn, trainee_id)?;
        let mut prev: Option<f64> = None;
        Ok(list
            .into_iter()
            .map(|w| {
                let delta = prev.map(|p| w.kg - p);
                prev = Some(w.kg);
                (w, delta)
            })
            .collect())
    }
}
