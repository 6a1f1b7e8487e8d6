use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// One schema step. Applied steps are recorded in the `log` table as
/// `migration_applied` with the version as target.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_members_and_gyms",
        description: "Created members, gyms, memberships and offline contacts",
        sql: r#"
        CREATE TABLE IF NOT EXISTS members (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            belt        TEXT NOT NULL DEFAULT 'white'
                        CHECK(belt IN ('white','blue','purple','brown','black')),
            stripes     INTEGER NOT NULL DEFAULT 0 CHECK(stripes BETWEEN 0 AND 4),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS gyms (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            owner_id     INTEGER NOT NULL REFERENCES members(id),
            invite_code  TEXT NOT NULL UNIQUE,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS memberships (
            gym_id     INTEGER NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
            member_id  INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            joined_at  TEXT NOT NULL,
            PRIMARY KEY (gym_id, member_id)
        );

        CREATE TABLE IF NOT EXISTS offline_contacts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            gym_id      INTEGER NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            belt        TEXT CHECK(belt IS NULL OR belt IN ('white','blue','purple','brown','black')),
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0002_checkins_rounds_events",
        description: "Created checkins, rounds and round_events",
        sql: r#"
        CREATE TABLE IF NOT EXISTS checkins (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            trainee_id    INTEGER NOT NULL REFERENCES members(id),
            gym_id        INTEGER NOT NULL REFERENCES gyms(id),
            session_type  TEXT NOT NULL CHECK(session_type IN ('gi','nogi','open_mat')),
            started_at    TEXT NOT NULL,
            ended_at      TEXT,
            energy        INTEGER CHECK(energy IS NULL OR energy BETWEEN 1 AND 5),
            note          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_trainee_start ON checkins(trainee_id, started_at);

        -- at most one open check-in per trainee per gym
        CREATE UNIQUE INDEX IF NOT EXISTS idx_checkins_single_open
            ON checkins(trainee_id, gym_id) WHERE ended_at IS NULL;

        CREATE TABLE IF NOT EXISTS rounds (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            checkin_id          INTEGER NOT NULL REFERENCES checkins(id) ON DELETE CASCADE,
            seq                 INTEGER NOT NULL,
            started_at          TEXT NOT NULL,
            ended_at            TEXT,
            opponent_member_id  INTEGER REFERENCES members(id) ON DELETE SET NULL,
            guest_name          TEXT,
            guest_belt          TEXT,
            result              TEXT CHECK(result IS NULL OR result IN ('win','draw','loss'))
        );

        CREATE INDEX IF NOT EXISTS idx_rounds_checkin ON rounds(checkin_id, seq);

        -- at most one open round per check-in
        CREATE UNIQUE INDEX IF NOT EXISTS idx_rounds_single_open
            ON rounds(checkin_id) WHERE ended_at IS NULL;

        CREATE TABLE IF NOT EXISTS round_events (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            round_id   INTEGER NOT NULL REFERENCES rounds(id) ON DELETE CASCADE,
            category   TEXT NOT NULL,
            direction  TEXT NOT NULL CHECK(direction IN ('offensive','defensive')),
            technique  TEXT NOT NULL,
            position   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_round_events_round ON round_events(round_id);
        "#,
    },
    Migration {
        version: "20250308_0003_injuries_drilled_curriculum",
        description: "Created injuries, techniques_drilled and curriculum tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS injuries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            trainee_id   INTEGER NOT NULL REFERENCES members(id),
            checkin_id   INTEGER REFERENCES checkins(id) ON DELETE SET NULL,
            body_part    TEXT NOT NULL,
            injury_type  TEXT NOT NULL,
            severity     TEXT NOT NULL CHECK(severity IN ('mild','moderate','severe')),
            created_at   TEXT NOT NULL,
            resolved_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS curriculum (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            gym_id      INTEGER NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
            date        TEXT NOT NULL,
            title       TEXT NOT NULL,
            notes       TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_curriculum_gym_date ON curriculum(gym_id, date);

        CREATE TABLE IF NOT EXISTS curriculum_techniques (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            curriculum_id  INTEGER NOT NULL REFERENCES curriculum(id) ON DELETE CASCADE,
            category       TEXT NOT NULL,
            name           TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS techniques_drilled (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            checkin_id     INTEGER NOT NULL REFERENCES checkins(id) ON DELETE CASCADE,
            category       TEXT NOT NULL,
            name           TEXT NOT NULL,
            curriculum_id  INTEGER REFERENCES curriculum(id) ON DELETE SET NULL
        );
        "#,
    },
    Migration {
        version: "20250315_0004_weights_promotions",
        description: "Created weights and promotions tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS weights (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            trainee_id  INTEGER NOT NULL REFERENCES members(id),
            date        TEXT NOT NULL,
            kg          REAL NOT NULL CHECK(kg > 0)
        );

        CREATE INDEX IF NOT EXISTS idx_weights_trainee_date ON weights(trainee_id, date);

        CREATE TABLE IF NOT EXISTS promotions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            gym_id       INTEGER NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
            member_id    INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            promoted_by  INTEGER NOT NULL REFERENCES members(id),
            belt         TEXT NOT NULL,
            stripes      INTEGER NOT NULL,
            promoted_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250322_0005_leaderboard_view",
        description: "Created leaderboard_month view",
        sql: r#"
        CREATE VIEW IF NOT EXISTS leaderboard_month AS
        SELECT
            c.gym_id                                   AS gym_id,
            c.trainee_id                               AS trainee_id,
            m.name                                     AS name,
            COUNT(*)                                   AS sessions,
            CAST(IFNULL(SUM(ROUND((julianday(c.ended_at) - julianday(c.started_at)) * 1440)), 0)
                 AS INTEGER)                           AS minutes,
            COUNT(DISTINCT date(c.started_at, 'localtime')) AS unique_days,
            SUM(c.session_type = 'gi')                 AS gi_sessions,
            SUM(c.session_type = 'nogi')               AS nogi_sessions,
            SUM(c.session_type = 'open_mat')           AS open_mat_sessions
        FROM checkins c
        JOIN members m ON m.id = c.trainee_id
        WHERE c.ended_at IS NOT NULL
          AND strftime('%Y-%m', c.started_at, 'localtime') = strftime('%Y-%m', 'now', 'localtime')
        GROUP BY c.gym_id, c.trainee_id;
        "#,
    },
];

/// Ensure that the `log` table exists: it doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql).map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Migration {} failed: {}", m.version, e)),
        )
    })?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()
}

/// Public entry point: run all pending migrations, in order.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
