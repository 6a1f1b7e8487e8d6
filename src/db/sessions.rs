use crate::db::db_utils::{Window, conversion_err, opt_ts_column, ts_column, ts_to_db, window_params};
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::models::session_type::SessionType;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, trainee_id, gym_id, session_type, started_at, ended_at, energy, note";

pub fn map_row(row: &Row) -> rusqlite::Result<Session> {
    let type_str: String = row.get("session_type")?;
    let session_type = SessionType::from_db_str(&type_str).ok_or_else(|| {
        conversion_err(
            3,
            AppError::Validation(format!("Invalid session type: {}", type_str)),
        )
    })?;

    let started: String = row.get("started_at")?;

    Ok(Session {
        id: row.get("id")?,
        trainee_id: row.get("trainee_id")?,
        gym_id: row.get("gym_id")?,
        session_type,
        started_at: ts_column(4, &started)?,
        ended_at: opt_ts_column(5, row.get("ended_at")?)?,
        energy: row.get::<_, Option<i64>>("energy")?.map(|e| e as u8),
        note: row.get("note")?,
    })
}

/// Insert a check-in; `ended_at = None` creates an open one.
pub fn insert_session(
    conn: &Connection,
    trainee_id: i64,
    gym_id: i64,
    session_type: SessionType,
    started_at: &DateTime<Utc>,
    ended_at: Option<&DateTime<Utc>>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO checkins (trainee_id, gym_id, session_type, started_at, ended_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            trainee_id,
            gym_id,
            session_type.to_db_str(),
            ts_to_db(started_at),
            ended_at.map(ts_to_db),
        ],
    )
    .map_err(|e| {
        AppError::from_unique_violation(e, "You are already checked in at this gym.")
    })?;

    Ok(conn.last_insert_rowid())
}

pub fn get_session(conn: &Connection, id: i64) -> AppResult<Option<Session>> {
    let sql = format!("SELECT {COLUMNS} FROM checkins WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Load a session and make sure it belongs to the given trainee.
pub fn get_owned_session(conn: &Connection, id: i64, trainee_id: i64) -> AppResult<Session> {
    match get_session(conn, id)? {
        Some(s) if s.trainee_id == trainee_id => Ok(s),
        _ => Err(AppError::NotFound(format!("Session #{} not found.", id))),
    }
}

pub fn find_open_session(
    conn: &Connection,
    trainee_id: i64,
    gym_id: i64,
) -> AppResult<Option<Session>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM checkins
         WHERE trainee_id = ?1 AND gym_id = ?2 AND ended_at IS NULL
         ORDER BY started_at DESC
         LIMIT 1"
    );
    Ok(conn
        .query_row(&sql, params![trainee_id, gym_id], map_row)
        .optional()?)
}

pub fn close_session(conn: &Connection, id: i64, ended_at: &DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE checkins SET ended_at = ?1 WHERE id = ?2",
        params![ts_to_db(ended_at), id],
    )?;
    Ok(())
}

pub fn update_debrief(
    conn: &Connection,
    id: i64,
    energy: Option<u8>,
    note: Option<&str>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE checkins SET energy = ?1, note = ?2 WHERE id = ?3",
        params![energy.map(i64::from), note, id],
    )?;
    Ok(())
}

/// Update all editable fields (all fields except id/trainee/gym).
pub fn update_session(conn: &Connection, s: &Session) -> AppResult<()> {
    conn.execute(
        "UPDATE checkins
         SET session_type = ?1, started_at = ?2, ended_at = ?3, energy = ?4, note = ?5
         WHERE id = ?6",
        params![
            s.session_type.to_db_str(),
            ts_to_db(&s.started_at),
            s.ended_at.as_ref().map(ts_to_db),
            s.energy.map(i64::from),
            s.note,
            s.id,
        ],
    )?;
    Ok(())
}

pub fn delete_session(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM checkins WHERE id = ?1", [id])?)
}

/// Sessions of a trainee at a gym, optionally limited to `[from, to)`.
pub fn list_sessions(
    conn: &Connection,
    trainee_id: i64,
    gym_id: i64,
    window: Window,
) -> AppResult<Vec<Session>> {
    let (from, to) = window_params(window);

    let sql = format!(
        "SELECT {COLUMNS} FROM checkins
         WHERE trainee_id = ?1 AND gym_id = ?2
           AND (?3 IS NULL OR started_at >= ?3)
           AND (?4 IS NULL OR started_at < ?4)
         ORDER BY started_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![trainee_id, gym_id, from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
