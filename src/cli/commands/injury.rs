use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, InjuryAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::injury::{InjuryCheck, InjuryLogic, parse_injury_spec};
use crate::db::injuries;
use crate::errors::AppResult;
use crate::models::injury::{Injury, Severity};
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};
use crate::utils::date;
use crate::utils::table::Table;
use crate::utils::time::local_datetime;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Injury { action } = cmd {
        let trainee = Context::trainee_from_config(cfg)?;
        let pool = open_pool(cfg)?;
        let conn = &pool.conn;

        match action {
            InjuryAction::List { all } => {
                let list = injuries::list_injuries(conn, trainee, *all)?;
                if list.is_empty() {
                    info("No injuries logged. Keep it that way! 🙏");
                    return Ok(());
                }
                print_injuries(&list, &cfg.separator_char);
            }
            InjuryAction::Add { spec } => {
                let injury = parse_injury_spec(spec)?;
                let id = InjuryLogic::report(conn, trainee, &injury)?;
                success(format!("Injury #{} logged.", id));
            }
            InjuryAction::Resolve { id } => {
                InjuryLogic::resolve(conn, trainee, *id)?;
                success(format!("Injury #{} resolved.", id));
            }
            InjuryAction::Check { force } => {
                let check = InjuryCheck::for_database(&cfg.database);
                let today = date::today();
                if !*force && !check.is_due(trainee, today) {
                    info("Injury check already done today.");
                    return Ok(());
                }
                run_check(conn, trainee)?;
                check.mark_done(trainee, today)?;
            }
        }
    }

    Ok(())
}

fn severity_color(s: Severity) -> &'static str {
    match s {
        Severity::Mild => GREEN,
        Severity::Moderate => YELLOW,
        Severity::Severe => RED,
    }
}

fn print_injuries(list: &[Injury], separator_char: &str) {
    let mut t = Table::new(&["ID", "SINCE", "PART", "TYPE", "SEVERITY", "RESOLVED"]);
    for i in list {
        t.add_row(vec![
            i.id.to_string(),
            local_datetime(&i.created_at),
            i.body_part.clone(),
            i.injury_type.clone(),
            format!("{}{}{}", severity_color(i.severity), i.severity.to_db_str(), RESET),
            i.resolved_at.as_ref().map(local_datetime).unwrap_or_else(|| "--".into()),
        ]);
    }
    print!("{}", t.render(separator_char));
}

/// Walk through the active injuries, then offer to log a new one.
fn run_check(conn: &Connection, trainee: i64) -> AppResult<()> {
    let active = InjuryLogic::active(conn, trainee)?;
    if active.is_empty() {
        info("No active injuries.");
    }
    for i in &active {
        let q = format!(
            "Is your {} {} ({}) healed?",
            i.body_part,
            i.injury_type,
            i.severity.to_db_str()
        );
        if confirm(q)? {
            InjuryLogic::resolve(conn, trainee, i.id)?;
            success(format!("Injury #{} resolved.", i.id));
        }
    }

    if confirm("Anything new hurting?")? {
        print!("Describe it as part:type:severity: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        match parse_injury_spec(line.trim()) {
            Ok(injury) => {
                let id = InjuryLogic::report(conn, trainee, &injury)?;
                success(format!("Injury #{} logged.", id));
            }
            Err(e) => warning(e),
        }
    }
    Ok(())
}
