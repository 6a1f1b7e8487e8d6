use crate::errors::AppResult;
use rusqlite::Connection;
use serde::Serialize;

/// One row of the store-side `leaderboard_month` view.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub trainee_id: i64,
    pub name: String,
    pub sessions: i64,
    pub minutes: i64,
    pub unique_days: i64,
    pub gi_sessions: i64,
    pub nogi_sessions: i64,
    pub open_mat_sessions: i64,
}

/// Current-month counts for a gym, most active first.
pub fn load_leaderboard(conn: &Connection, gym_id: i64) -> AppResult<Vec<LeaderboardRow>> {
    let mut stmt = conn.prepare(
        "SELECT trainee_id, name, sessions, minutes, unique_days,
                gi_sessions, nogi_sessions, open_mat_sessions
         FROM leaderboard_month
         WHERE gym_id = ?1
         ORDER BY sessions DESC, minutes DESC, name ASC",
    )?;
    let rows = stmt.query_map([gym_id], |row| {
        Ok(LeaderboardRow {
            trainee_id: row.get(0)?,
            name: row.get(1)?,
            sessions: row.get(2)?,
            minutes: row.get(3)?,
            unique_days: row.get(4)?,
            gi_sessions: row.get(5)?,
            nogi_sessions: row.get(6)?,
            open_mat_sessions: row.get(7)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
