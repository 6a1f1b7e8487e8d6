use crate::db::db_utils::{Window, conversion_err, window_params};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::event::{EventTag, RoundEvent};
use rusqlite::{Connection, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<RoundEvent> {
    let dir_str: String = row.get("direction")?;
    let direction = Direction::from_db_str(&dir_str).ok_or_else(|| {
        conversion_err(
            3,
            AppError::Validation(format!("Invalid direction: {}", dir_str)),
        )
    })?;
    let category: String = row.get("category")?;

    Ok(RoundEvent {
        id: row.get("id")?,
        round_id: row.get("round_id")?,
        tag: EventTag {
            category: Category::parse(&category),
            direction,
            technique: row.get("technique")?,
            position: row.get("position")?,
        },
    })
}

/// Write a whole buffer for one round.
pub fn insert_events(conn: &Connection, round_id: i64, tags: &[EventTag]) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO round_events (round_id, category, direction, technique, position)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for t in tags {
        stmt.execute(params![
            round_id,
            t.category.as_str(),
            t.direction.to_db_str(),
            t.technique,
            t.position,
        ])?;
    }
    Ok(())
}

pub fn delete_for_round(conn: &Connection, round_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM round_events WHERE round_id = ?1", [round_id])?)
}

pub fn list_for_round(conn: &Connection, round_id: i64) -> AppResult<Vec<RoundEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, round_id, category, direction, technique, position
         FROM round_events WHERE round_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([round_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events of every round the trainee logged at a gym.
pub fn list_for_trainee(
    conn: &Connection,
    trainee_id: i64,
    gym_id: i64,
    window: Window,
) -> AppResult<Vec<RoundEvent>> {
    let (from, to) = window_params(window);
    let mut stmt = conn.prepare(
        "SELECT e.id, e.round_id, e.category, e.direction, e.technique, e.position
         FROM round_events e
         JOIN rounds r   ON r.id = e.round_id
         JOIN checkins c ON c.id = r.checkin_id
         WHERE c.trainee_id = ?1 AND c.gym_id = ?2
           AND (?3 IS NULL OR c.started_at >= ?3)
           AND (?4 IS NULL OR c.started_at < ?4)
         ORDER BY e.id ASC",
    )?;
    let rows = stmt.query_map(params![trainee_id, gym_id, from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
