use crate::db::db_utils::{Window, conversion_err, opt_ts_column, ts_column, ts_to_db, window_params};
use crate::errors::{AppError, AppResult};
use crate::models::opponent::Opponent;
use crate::models::round::{Round, RoundResult};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

// duration is derived here, in the store, never on the client side
const COLUMNS: &str = "id, checkin_id, seq, started_at, ended_at,
     opponent_member_id, guest_name, guest_belt, result,
     CASE WHEN ended_at IS NULL THEN NULL
          ELSE CAST(ROUND((julianday(ended_at) - julianday(started_at)) * 86400) AS INTEGER)
     END AS duration_secs";

pub fn map_row(row: &Row) -> rusqlite::Result<Round> {
    let started: String = row.get("started_at")?;

    let result = match row.get::<_, Option<String>>("result")? {
        Some(r) => Some(RoundResult::from_db_str(&r).ok_or_else(|| {
            conversion_err(8, AppError::Validation(format!("Invalid result: {}", r)))
        })?),
        None => None,
    };

    Ok(Round {
        id: row.get("id")?,
        session_id: row.get("checkin_id")?,
        seq: row.get("seq")?,
        started_at: ts_column(3, &started)?,
        ended_at: opt_ts_column(4, row.get("ended_at")?)?,
        opponent: Opponent::from_columns(
            row.get("opponent_member_id")?,
            row.get("guest_name")?,
            row.get("guest_belt")?,
        ),
        result,
        duration_secs: row.get("duration_secs")?,
    })
}

pub fn insert_open_round(
    conn: &Connection,
    session_id: i64,
    seq: i64,
    started_at: &DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO rounds (checkin_id, seq, started_at) VALUES (?1, ?2, ?3)",
        params![session_id, seq, ts_to_db(started_at)],
    )
    .map_err(|e| AppError::from_unique_violation(e, "A round is already running."))?;

    Ok(conn.last_insert_rowid())
}

/// Insert an already-closed round (backfill path).
pub fn insert_finalized_round(
    conn: &Connection,
    session_id: i64,
    seq: i64,
    started_at: &DateTime<Utc>,
    ended_at: &DateTime<Utc>,
    opponent: &Opponent,
    result: Option<RoundResult>,
) -> AppResult<i64> {
    let (member_id, guest_name, guest_belt) = opponent.to_columns();
    conn.execute(
        "INSERT INTO rounds
            (checkin_id, seq, started_at, ended_at, opponent_member_id, guest_name, guest_belt, result)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            session_id,
            seq,
            ts_to_db(started_at),
            ts_to_db(ended_at),
            member_id,
            guest_name,
            guest_belt,
            result.map(|r| r.to_db_str()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_round(conn: &Connection, id: i64) -> AppResult<Option<Round>> {
    let sql = format!("SELECT {COLUMNS} FROM rounds WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

pub fn find_open_round(conn: &Connection, session_id: i64) -> AppResult<Option<Round>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM rounds
         WHERE checkin_id = ?1 AND ended_at IS NULL
         ORDER BY started_at DESC
         LIMIT 1"
    );
    Ok(conn.query_row(&sql, [session_id], map_row).optional()?)
}

pub fn count_finalized(conn: &Connection, session_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM rounds WHERE checkin_id = ?1 AND ended_at IS NOT NULL",
        [session_id],
        |row| row.get(0),
    )?)
}

pub fn count_all(conn: &Connection, session_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM rounds WHERE checkin_id = ?1",
        [session_id],
        |row| row.get(0),
    )?)
}

/// Close a round: end timestamp + opponent + result.
pub fn finalize_round(
    conn: &Connection,
    id: i64,
    ended_at: &DateTime<Utc>,
    opponent: &Opponent,
    result: Option<RoundResult>,
) -> AppResult<()> {
    let (member_id, guest_name, guest_belt) = opponent.to_columns();
    conn.execute(
        "UPDATE rounds
         SET ended_at = ?1, opponent_member_id = ?2, guest_name = ?3, guest_belt = ?4, result = ?5
         WHERE id = ?6",
        params![
            ts_to_db(ended_at),
            member_id,
            guest_name,
            guest_belt,
            result.map(|r| r.to_db_str()),
            id,
        ],
    )?;
    Ok(())
}

pub fn update_outcome(
    conn: &Connection,
    id: i64,
    opponent: &Opponent,
    result: Option<RoundResult>,
) -> AppResult<()> {
    let (member_id, guest_name, guest_belt) = opponent.to_columns();
    conn.execute(
        "UPDATE rounds
         SET opponent_member_id = ?1, guest_name = ?2, guest_belt = ?3, result = ?4
         WHERE id = ?5",
        params![
            member_id,
            guest_name,
            guest_belt,
            result.map(|r| r.to_db_str()),
            id
        ],
    )?;
    Ok(())
}

pub fn delete_round(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM rounds WHERE id = ?1", [id])?)
}

pub fn list_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<Round>> {
    let sql = format!("SELECT {COLUMNS} FROM rounds WHERE checkin_id = ?1 ORDER BY seq ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([session_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Rounds of every session of a trainee at a gym, optionally limited to a window
/// on the session start.
pub fn list_for_trainee(
    conn: &Connection,
    trainee_id: i64,
    gym_id: i64,
    window: Window,
) -> AppResult<Vec<Round>> {
    let (from, to) = window_params(window);

    let sql = format!(
        "SELECT {COLUMNS} FROM rounds
         WHERE checkin_id IN (
             SELECT id FROM checkins
             WHERE trainee_id = ?1 AND gym_id = ?2
               AND (?3 IS NULL OR started_at >= ?3)
               AND (?4 IS NULL OR started_at < ?4)
         )
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
