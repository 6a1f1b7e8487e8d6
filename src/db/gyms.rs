use crate::db::db_utils::ts_to_db;
use crate::errors::{AppError, AppResult};
use crate::models::gym::Gym;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<Gym> {
    Ok(Gym {
        id: row.get("id")?,
        name: row.get("name")?,
        owner_id: row.get("owner_id")?,
        invite_code: row.get("invite_code")?,
    })
}

pub fn insert_gym(conn: &Connection, name: &str, owner_id: i64, code: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO gyms (name, owner_id, invite_code, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, owner_id, code, ts_to_db(&Utc::now())],
    )
    .map_err(|e| AppError::from_unique_violation(e, "This invite code is already taken."))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_gym(conn: &Connection, id: i64) -> AppResult<Option<Gym>> {
    Ok(conn
        .query_row(
            "SELECT id, name, owner_id, invite_code FROM gyms WHERE id = ?1",
            [id],
            map_row,
        )
        .optional()?)
}

pub fn find_by_code(conn: &Connection, code: &str) -> AppResult<Option<Gym>> {
    Ok(conn
        .query_row(
            "SELECT id, name, owner_id, invite_code FROM gyms WHERE invite_code = ?1",
            [code.trim().to_uppercase()],
            map_row,
        )
        .optional()?)
}

pub fn list_gyms_for_member(conn: &Connection, member_id: i64) -> AppResult<Vec<Gym>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, g.owner_id, g.invite_code
         FROM gyms g JOIN memberships ms ON ms.gym_id = g.id
         WHERE ms.member_id = ?1
         ORDER BY g.name ASC",
    )?;
    let rows = stmt.query_map([member_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_membership(conn: &Connection, gym_id: i64, member_id: i64) -> AppResult<()> {
    conn.execute(
        "INSERT INTO memberships (gym_id, member_id, joined_at) VALUES (?1, ?2, ?3)",
        params![gym_id, member_id, ts_to_db(&Utc::now())],
    )
    .map_err(|e| AppError::from_unique_violation(e, "You are already a member of this gym."))?;
    Ok(())
}

pub fn is_member(conn: &Connection, gym_id: i64, member_id: i64) -> AppResult<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM memberships WHERE gym_id = ?1 AND member_id = ?2 LIMIT 1")?;
    Ok(stmt.exists(params![gym_id, member_id])?)
}
