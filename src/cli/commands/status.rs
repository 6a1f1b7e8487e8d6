use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::lifecycle::{LifecycleState, SessionController};
use crate::db::rounds;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};
use crate::utils::time::{format_elapsed, local_hhmm};
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status = cmd {
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;
        let ctl = SessionController::resume(&pool.conn, ctx)?;

        let Some(session) = ctl.session() else {
            info("Not checked in.");
            return Ok(());
        };

        let finished = rounds::count_finalized(&pool.conn, session.id)?;
        println!(
            "🥋 Session #{} ({}) since {}, {} round(s) done",
            session.id,
            session.session_type.label(),
            local_hhmm(&session.started_at),
            finished
        );

        let now = Utc::now();
        let elapsed = ctl.elapsed(now).map(|d| d.num_seconds()).unwrap_or(0);

        match (ctl.state(), ctl.round()) {
            (LifecycleState::RoundActive, Some(r)) => {
                let target = cfg.round_minutes * 60;
                let color = if elapsed >= target { RED } else { GREEN };
                println!(
                    "⏱️  Round {} running: {}{}{} / {}",
                    r.seq,
                    color,
                    format_elapsed(elapsed),
                    RESET,
                    format_elapsed(target)
                );
            }
            _ => {
                println!("⏱️  On the mat for {}{}{}", YELLOW, format_elapsed(elapsed), RESET);
            }
        }
    }

    Ok(())
}
