use crate::db::db_utils::{conversion_err, opt_ts_column, ts_column, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::injury::{Injury, NewInjury, Severity};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<Injury> {
    let sev: String = row.get("severity")?;
    let severity = Severity::from_db_str(&sev).ok_or_else(|| {
        conversion_err(5, AppError::Validation(format!("Invalid severity: {}", sev)))
    })?;
    let created: String = row.get("created_at")?;

    Ok(Injury {
        id: row.get("id")?,
        trainee_id: row.get("trainee_id")?,
        session_id: row.get("checkin_id")?,
        body_part: row.get("body_part")?,
        injury_type: row.get("injury_type")?,
        severity,
        created_at: ts_column(6, &created)?,
        resolved_at: opt_ts_column(7, row.get("resolved_at")?)?,
    })
}

pub fn insert_injury(
    conn: &Connection,
    trainee_id: i64,
    session_id: Option<i64>,
    injury: &NewInjury,
    created_at: &DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO injuries (trainee_id, checkin_id, body_part, injury_type, severity, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            trainee_id,
            session_id,
            injury.body_part,
            injury.injury_type,
            injury.severity.to_db_str(),
            ts_to_db(created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_injuries(
    conn: &Connection,
    trainee_id: i64,
    include_resolved: bool,
) -> AppResult<Vec<Injury>> {
    let mut stmt = conn.prepare(
        "SELECT id, trainee_id, checkin_id, body_part, injury_type, severity, created_at, resolved_at
         FROM injuries
         WHERE trainee_id = ?1 AND (?2 OR resolved_at IS NULL)
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![trainee_id, include_resolved], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Mark an active injury as resolved. Returns false when nothing matched.
pub fn resolve_injury(
    conn: &Connection,
    id: i64,
    trainee_id: i64,
    resolved_at: &DateTime<Utc>,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE injuries SET resolved_at = ?1
         WHERE id = ?2 AND trainee_id = ?3 AND resolved_at IS NULL",
        params![ts_to_db(resolved_at), id, trainee_id],
    )?;
    Ok(n > 0)
}
