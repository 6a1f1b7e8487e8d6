use crate::cli::commands::{build_debrief, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::injury::InjuryCheck;
use crate::core::lifecycle::SessionController;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date;
use crate::utils::formatting::mins2readable;
use crate::utils::time::local_hhmm;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkout {
        skip,
        energy,
        note,
        injuries,
        drilled,
    } = cmd
    {
        // nothing is written if any debrief field is malformed
        let debrief = build_debrief(*energy, note.as_deref(), injuries, drilled)?;
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;

        let mut ctl = SessionController::resume(&pool.conn, ctx)?;
        if ctl.session().is_none() {
            return Err(AppError::InvalidState("You are not checked in.".into()));
        }
        if ctl.round().is_some() {
            info("The running round was closed without events.");
        }

        let session = ctl.check_out(debrief, *skip)?;
        let end = session.ended_at.as_ref().map(local_hhmm).unwrap_or_default();
        success(format!(
            "Checked out at {} after {} (session #{}).",
            end,
            mins2readable(session.duration_minutes().unwrap_or(0), false, false),
            session.id
        ));

        report_injury_check(cfg, ctx.trainee_id);
    }

    Ok(())
}

pub(crate) fn report_injury_check(cfg: &Config, trainee_id: i64) {
    if cfg.injury_check && InjuryCheck::for_database(&cfg.database).is_due(trainee_id, date::today()) {
        info("Injury check pending: run `rmatlog injury check`.");
    }
}
