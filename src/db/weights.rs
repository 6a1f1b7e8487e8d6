use crate::db::db_utils::{conversion_err, date_from_db, date_to_db};
use crate::errors::AppResult;
use crate::models::weight::WeightEntry;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub fn insert_weight(conn: &Connection, trainee_id: i64, date: &NaiveDate, kg: f64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO weights (trainee_id, date, kg) VALUES (?1, ?2, ?3)",
        params![trainee_id, date_to_db(date), kg],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_weights(conn: &Connection, trainee_id: i64) -> AppResult<Vec<WeightEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, trainee_id, date, kg FROM weights WHERE trainee_id = ?1 ORDER BY date ASC, id ASC",
    )?;
    let rows = stmt.query_map([trainee_id], |row| {
        let date: String = row.get(2)?;
        Ok(WeightEntry {
            id: row.get(0)?,
            trainee_id: row.get(1)?,
            date: date_from_db(&date).map_err(|e| conversion_err(2, e))?,
            kg: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
