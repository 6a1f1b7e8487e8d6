use crate::db::db_utils::{conversion_err, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::belt::Belt;
use crate::models::member::{Member, OfflineContact};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn belt_column(col: usize, raw: &str) -> rusqlite::Result<Belt> {
    Belt::from_db_str(raw)
        .ok_or_else(|| conversion_err(col, AppError::Validation(format!("Invalid belt: {}", raw))))
}

fn map_member(row: &Row) -> rusqlite::Result<Member> {
    let belt: String = row.get("belt")?;
    Ok(Member {
        id: row.get("id")?,
        name: row.get("name")?,
        belt: belt_column(2, &belt)?,
        stripes: row.get("stripes")?,
    })
}

fn map_contact(row: &Row) -> rusqlite::Result<OfflineContact> {
    let belt = match row.get::<_, Option<String>>("belt")? {
        Some(b) => Some(belt_column(3, &b)?),
        None => None,
    };
    Ok(OfflineContact {
        id: row.get("id")?,
        gym_id: row.get("gym_id")?,
        name: row.get("name")?,
        belt,
    })
}

pub fn insert_member(conn: &Connection, name: &str, belt: Belt, stripes: i64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO members (name, belt, stripes, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, belt.to_db_str(), stripes, ts_to_db(&Utc::now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_member(conn: &Connection, id: i64) -> AppResult<Option<Member>> {
    Ok(conn
        .query_row(
            "SELECT id, name, belt, stripes FROM members WHERE id = ?1",
            [id],
            map_member,
        )
        .optional()?)
}

pub fn list_members(conn: &Connection) -> AppResult<Vec<Member>> {
    let mut stmt = conn.prepare("SELECT id, name, belt, stripes FROM members ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_member)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Registered members of one gym.
pub fn list_gym_members(conn: &Connection, gym_id: i64) -> AppResult<Vec<Member>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.name, m.belt, m.stripes
         FROM members m
         JOIN memberships ms ON ms.member_id = m.id
         WHERE ms.gym_id = ?1
         ORDER BY m.name ASC",
    )?;
    let rows = stmt.query_map([gym_id], map_member)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_rank(conn: &Connection, id: i64, belt: Belt, stripes: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE members SET belt = ?1, stripes = ?2 WHERE id = ?3",
        params![belt.to_db_str(), stripes, id],
    )?;
    Ok(())
}

pub fn insert_contact(
    conn: &Connection,
    gym_id: i64,
    name: &str,
    belt: Option<Belt>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO offline_contacts (gym_id, name, belt, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            gym_id,
            name,
            belt.map(|b| b.to_db_str()),
            ts_to_db(&Utc::now())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_contacts(conn: &Connection, gym_id: i64) -> AppResult<Vec<OfflineContact>> {
    let mut stmt = conn.prepare(
        "SELECT id, gym_id, name, belt FROM offline_contacts WHERE gym_id = ?1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([gym_id], map_contact)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_promotion(
    conn: &Connection,
    gym_id: i64,
    member_id: i64,
    promoted_by: i64,
    belt: Belt,
    stripes: i64,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO promotions (gym_id, member_id, promoted_by, belt, stripes, promoted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            gym_id,
            member_id,
            promoted_by,
            belt.to_db_str(),
            stripes,
            ts_to_db(&Utc::now())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
