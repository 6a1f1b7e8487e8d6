use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, params};

/// Timestamps are persisted as UTC RFC 3339 text ("2025-03-01T18:30:00Z").
pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ts_from_db(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTime(raw.to_string()))
}

pub fn date_to_db(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn date_from_db(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(raw.to_string()))
}

/// Half-open `[from, to)` filter on a session start; `None` = no limit.
pub type Window = Option<(DateTime<Utc>, DateTime<Utc>)>;

pub fn window_params(window: Window) -> (Option<String>, Option<String>) {
    match window {
        Some((f, t)) => (Some(ts_to_db(&f)), Some(ts_to_db(&t))),
        None => (None, None),
    }
}

/// Wrap a conversion failure so it can travel through `query_map`.
pub fn conversion_err(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub fn ts_column(col: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    ts_from_db(raw).map_err(|e| conversion_err(col, e))
}

pub fn opt_ts_column(col: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|r| ts_column(col, &r)).transpose()
}

/// Reassign `seq` for every round of a session.
///
/// Rounds are ordered by start time; each one gets the next number starting
/// from 1, so deletions never leave gaps or repeats behind.
pub fn renumber_rounds(conn: &Connection, session_id: i64) -> AppResult<()> {
    // 1️⃣ collect ids first, the statement must be dropped before updating
    let ids: Vec<i64> = {
        let mut stmt = conn.prepare(
            "SELECT id FROM rounds WHERE checkin_id = ?1 ORDER BY started_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([session_id], |row| row.get::<_, i64>(0))?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    // 2️⃣ rewrite sequence numbers
    for (idx, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE rounds SET seq = ?1 WHERE id = ?2",
            params![idx as i64 + 1, id],
        )?;
    }

    Ok(())
}
