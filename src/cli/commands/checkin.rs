use crate::cli::commands::curriculum::print_post;
use crate::cli::commands::{open_pool, parse_session_type};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::lifecycle::SessionController;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::local_hhmm;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { session_type } = cmd {
        let kind = parse_session_type(session_type.as_deref(), cfg)?;
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;

        let mut ctl = SessionController::resume(&pool.conn, ctx)?;
        let session = ctl.check_in(kind)?;
        success(format!(
            "Checked in at {} for {} (session #{}).",
            local_hhmm(&session.started_at),
            kind.label(),
            session.id
        ));

        if let Some(post) = ctl.curriculum() {
            info("Today's curriculum:");
            print_post(post);
        }
    }

    Ok(())
}
