use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::migrate::applied_versions;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use rusqlite::Connection;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            init_db(&pool.conn)?;
            let versions = applied_versions(&pool.conn)?;
            println!("{}✔ Schema at {} migration(s).{}\n", GREEN, versions.len(), RESET);
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            run_checks(&pool.conn)?;
        }

        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}

/// SQLite integrity plus dangling references; cascades should keep the
/// latter at zero.
fn run_checks(conn: &Connection) -> AppResult<()> {
    println!("{}▶ Running integrity check…{}", CYAN, RESET);

    let integrity: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if integrity == "ok" {
        println!("{}✔ Integrity check passed.{}", GREEN, RESET);
    } else {
        println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
    }

    let mut stmt = conn.prepare("PRAGMA foreign_key_check;")?;
    let mut dangling = 0usize;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let table: String = row.get(0)?;
        let rowid: Option<i64> = row.get(1)?;
        let parent: String = row.get(2)?;
        println!(
            "{}✘ {} row {} points to a missing {} row{}",
            RED,
            table,
            rowid.map(|r| r.to_string()).unwrap_or_else(|| "?".into()),
            parent,
            RESET
        );
        dangling += 1;
    }
    if dangling == 0 {
        println!("{}✔ No dangling references.{}", GREEN, RESET);
    }

    let open: i64 = conn.query_row(
        "SELECT COUNT(*) FROM checkins WHERE ended_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    if open > 0 {
        println!("{}⚠ {} session(s) still checked in.{}", YELLOW, open, RESET);
    }
    println!();

    Ok(())
}
