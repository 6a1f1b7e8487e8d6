use crate::db::db_utils::{conversion_err, date_from_db, date_to_db, ts_to_db};
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::curriculum::{CurriculumPost, CurriculumTechnique};
use crate::models::drilled::{NewDrilled, TechniqueDrilled};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_post(row: &Row) -> rusqlite::Result<CurriculumPost> {
    let date: String = row.get("date")?;
    Ok(CurriculumPost {
        id: row.get("id")?,
        gym_id: row.get("gym_id")?,
        date: date_from_db(&date).map_err(|e| conversion_err(2, e))?,
        title: row.get("title")?,
        notes: row.get("notes")?,
        techniques: Vec::new(),
    })
}

fn load_techniques(conn: &Connection, curriculum_id: i64) -> AppResult<Vec<CurriculumTechnique>> {
    let mut stmt = conn.prepare(
        "SELECT category, name FROM curriculum_techniques WHERE curriculum_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([curriculum_id], |row| {
        let category: String = row.get(0)?;
        Ok(CurriculumTechnique {
            category: Category::parse(&category),
            name: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_post(
    conn: &Connection,
    gym_id: i64,
    date: &NaiveDate,
    title: &str,
    notes: Option<&str>,
    techniques: &[CurriculumTechnique],
) -> AppResult<i64> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO curriculum (gym_id, date, title, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![gym_id, date_to_db(date), title, notes, ts_to_db(&Utc::now())],
    )?;
    let id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO curriculum_techniques (curriculum_id, category, name) VALUES (?1, ?2, ?3)",
        )?;
        for t in techniques {
            stmt.execute(params![id, t.category.as_str(), t.name])?;
        }
    }

    tx.commit()?;
    Ok(id)
}

/// Same-day match: the most recent post for that calendar date, if any.
pub fn find_for_date(
    conn: &Connection,
    gym_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<CurriculumPost>> {
    let post = conn
        .query_row(
            "SELECT id, gym_id, date, title, notes FROM curriculum
             WHERE gym_id = ?1 AND date = ?2
             ORDER BY id DESC LIMIT 1",
            params![gym_id, date_to_db(date)],
            map_post,
        )
        .optional()?;

    match post {
        Some(mut p) => {
            p.techniques = load_techniques(conn, p.id)?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

pub fn list_posts(conn: &Connection, gym_id: i64) -> AppResult<Vec<CurriculumPost>> {
    let posts: Vec<CurriculumPost> = {
        let mut stmt = conn.prepare(
            "SELECT id, gym_id, date, title, notes FROM curriculum
             WHERE gym_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map([gym_id], map_post)?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    let mut out = Vec::with_capacity(posts.len());
    for mut p in posts {
        p.techniques = load_techniques(conn, p.id)?;
        out.push(p);
    }
    Ok(out)
}

pub fn insert_drilled(conn: &Connection, session_id: i64, items: &[NewDrilled]) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO techniques_drilled (checkin_id, category, name, curriculum_id)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for d in items {
        stmt.execute(params![session_id, d.category.as_str(), d.name, d.curriculum_id])?;
    }
    Ok(())
}

pub fn list_drilled(conn: &Connection, session_id: i64) -> AppResult<Vec<TechniqueDrilled>> {
    let mut stmt = conn.prepare(
        "SELECT id, checkin_id, category, name, curriculum_id
         FROM techniques_drilled WHERE checkin_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([session_id], |row| {
        let category: String = row.get("category")?;
        Ok(TechniqueDrilled {
            id: row.get("id")?,
            session_id: row.get("checkin_id")?,
            category: Category::parse(&category),
            name: row.get("name")?,
            curriculum_id: row.get("curriculum_id")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
