use crate::core::calculator::ResultTally;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::db::log::audit;
use crate::db::{events, rounds, sessions};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{EventExport, SessionExport};
use crate::models::round::Round;
use crate::ui::messages::warning;
use crate::utils::date::period_window;
use crate::utils::path::expand_tilde;
use crate::utils::time::local_hhmm;
use rusqlite::Connection;
use std::collections::HashMap;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the trainee's sessions (or, with `events`, every logged
    /// technique) at the current gym.
    ///
    /// `range`: `None`, `"all"` or `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, optionally
    /// as `start:end`. Returns the number of rows written.
    pub fn export(
        conn: &Connection,
        ctx: &Context,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        events: bool,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let window = period_window(range)?;
        ensure_writable(&path, force)?;

        let written = if events {
            let rows = load_event_rows(conn, ctx, window)?;
            if rows.is_empty() {
                warning("No events found for selected range.");
                return Ok(0);
            }
            write(format, &rows, &path)?;
            rows.len()
        } else {
            let rows = load_session_rows(conn, ctx, window)?;
            if rows.is_empty() {
                warning("No sessions found for selected range.");
                return Ok(0);
            }
            write(format, &rows, &path)?;
            rows.len()
        };

        audit(
            conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} {} rows", written, format.as_str()),
        );
        Ok(written)
    }
}

fn write<T: serde::Serialize>(format: ExportFormat, rows: &[T], path: &std::path::Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(rows, path),
        ExportFormat::Json => export_json(rows, path),
    }
}

pub(crate) fn load_session_rows(
    conn: &Connection,
    ctx: &Context,
    window: crate::db::db_utils::Window,
) -> AppResult<Vec<SessionExport>> {
    let list = sessions::list_sessions(conn, ctx.trainee_id, ctx.gym_id, window)?;
    let all_rounds = rounds::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;

    let mut by_session: HashMap<i64, Vec<&Round>> = HashMap::new();
    for r in all_rounds.iter().filter(|r| !r.is_open()) {
        by_session.entry(r.session_id).or_default().push(r);
    }

    Ok(list
        .iter()
        .map(|s| {
            let rs = by_session.get(&s.id).map(Vec::as_slice).unwrap_or(&[]);
            let tally = ResultTally::from_rounds(rs.iter().copied());
            SessionExport {
                id: s.id,
                date: s.local_date().to_string(),
                start: local_hhmm(&s.started_at),
                end: s.ended_at.as_ref().map(local_hhmm),
                session_type: s.session_type.to_db_str().to_string(),
                minutes: s.duration_minutes(),
                rounds: rs.len(),
                wins: tally.wins,
                draws: tally.draws,
                losses: tally.losses,
                energy: s.energy,
                note: s.note.clone(),
            }
        })
        .collect())
}

pub(crate) fn load_event_rows(
    conn: &Connection,
    ctx: &Context,
    window: crate::db::db_utils::Window,
) -> AppResult<Vec<EventExport>> {
    let roster = Roster::load(conn, ctx.gym_id)?;
    let list = sessions::list_sessions(conn, ctx.trainee_id, ctx.gym_id, window)?;
    let all_rounds = rounds::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;
    let all_events = events::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;

    let dates: HashMap<i64, String> = list
        .iter()
        .map(|s| (s.id, s.local_date().to_string()))
        .collect();
    let round_map: HashMap<i64, &Round> = all_rounds.iter().map(|r| (r.id, r)).collect();

    let mut out = Vec::new();
    for e in &all_events {
        let Some(r) = round_map.get(&e.round_id) else {
            continue;
        };
        out.push(EventExport {
            session_id: r.session_id,
            date: dates.get(&r.session_id).cloned().unwrap_or_default(),
            round: r.seq,
            opponent: roster.describe(&r.opponent),
            result: r.result.map(|x| x.to_db_str().to_string()),
            category: e.tag.category.to_string(),
            direction: e.tag.direction.to_db_str().to_string(),
            technique: e.tag.technique.clone(),
            position: e.tag.position.clone(),
        });
    }
    Ok(out)
}
