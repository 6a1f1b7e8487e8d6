use crate::cli::commands::{open_pool, parse_session_type};
use crate::cli::parser::{Commands, SessionAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::core::history::{HistoryLogic, SessionEdit};
use crate::db::{curriculum, events, rounds, sessions};
use crate::errors::AppResult;
use crate::models::direction::Direction;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, color_for_direction, color_for_result, colorize_optional};
use crate::utils::date::period_window;
use crate::utils::formatting::{mins2readable, secs2readable};
use crate::utils::table::Table;
use crate::utils::time::local_hhmm;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Session { action } = cmd {
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;
        let conn = &pool.conn;

        match action {
            SessionAction::List { period } => {
                let window = period_window(period.as_deref())?;
                let list = sessions::list_sessions(conn, ctx.trainee_id, ctx.gym_id, window)?;
                if list.is_empty() {
                    info("No sessions found for the selected period.");
                    return Ok(());
                }

                let mut per_session: HashMap<i64, usize> = HashMap::new();
                for r in rounds::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)? {
                    *per_session.entry(r.session_id).or_default() += 1;
                }

                let mut t = Table::new(&[
                    "ID", "DATE", "TYPE", "IN", "OUT", "DURATION", "ROUNDS", "ENERGY", "NOTE",
                ]);
                for s in &list {
                    t.add_row(vec![
                        s.id.to_string(),
                        s.local_date().to_string(),
                        s.session_type.label().to_string(),
                        local_hhmm(&s.started_at),
                        colorize_optional(&s.ended_at.as_ref().map(local_hhmm).unwrap_or_else(|| "--:--".into())),
                        s.duration_minutes()
                            .map(|m| mins2readable(m, false, true))
                            .unwrap_or_else(|| format!("{GREY}open{RESET}")),
                        per_session.get(&s.id).copied().unwrap_or(0).to_string(),
                        colorize_optional(&s.energy.map(|e| e.to_string()).unwrap_or_else(|| "--".into())),
                        s.note.clone().unwrap_or_default(),
                    ]);
                }
                print!("{}", t.render(&cfg.separator_char));
            }
            SessionAction::Show { id } => {
                let s = sessions::get_owned_session(conn, *id, ctx.trainee_id)?;
                let roster = Roster::load(conn, s.gym_id)?;

                println!(
                    "🥋 Session #{}  {}  {}  {} → {}",
                    s.id,
                    s.local_date(),
                    s.session_type.label(),
                    local_hhmm(&s.started_at),
                    s.ended_at.as_ref().map(local_hhmm).unwrap_or_else(|| "…".into())
                );
                if let Some(e) = s.energy {
                    println!("   Energy: {}/5", e);
                }
                if let Some(n) = &s.note {
                    println!("   Note:   {}", n);
                }

                for r in rounds::list_for_session(conn, s.id)? {
                    let result = r.result.map(|x| x.to_db_str()).unwrap_or("-");
                    println!(
                        "\n   Round {} (#{})  {}  vs {}  {}{}{}",
                        r.seq,
                        r.id,
                        r.duration_secs.map(secs2readable).unwrap_or_else(|| "running".into()),
                        roster.describe(&r.opponent),
                        color_for_result(r.result),
                        result,
                        RESET
                    );
                    for e in events::list_for_round(conn, r.id)? {
                        let color = color_for_direction(e.tag.direction);
                        let side = match e.tag.direction {
                            Direction::Offensive => "off",
                            Direction::Defensive => "def",
                        };
                        println!("      {}{}{} {}", color, side, RESET, e.tag.describe());
                    }
                }

                let drilled = curriculum::list_drilled(conn, s.id)?;
                if !drilled.is_empty() {
                    println!("\n   Drilled:");
                    for d in drilled {
                        println!("      • {} ({})", d.name, d.category);
                    }
                }
            }
            SessionAction::Edit {
                id,
                session_type,
                energy,
                note,
                start,
                end,
            } => {
                let edit = SessionEdit {
                    session_type: session_type
                        .as_deref()
                        .map(|t| parse_session_type(Some(t), cfg))
                        .transpose()?,
                    energy: *energy,
                    note: note.clone(),
                    start: start.clone(),
                    end: end.clone(),
                };
                let s = HistoryLogic::update_session(conn, &ctx, *id, &edit)?;
                success(format!("Session #{} updated.", s.id));
            }
            SessionAction::Del { id } => {
                HistoryLogic::delete_session(conn, &ctx, *id)?;
                success(format!("Session #{} deleted.", id));
            }
        }
    }

    Ok(())
}
