use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::{GymLogic, Promotion};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Promote {
        member,
        stripe,
        belt,
    } = cmd
    {
        let kind = match (*stripe, *belt) {
            (true, false) => Promotion::Stripe,
            (false, true) => Promotion::Belt,
            _ => {
                return Err(AppError::Validation(
                    "Choose one of --stripe or --belt.".into(),
                ));
            }
        };

        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;
        let m = GymLogic::promote(&pool.conn, &ctx, *member, kind)?;

        success(format!(
            "🥋 {} is now a {} belt with {} stripe(s)!",
            m.name,
            m.belt.to_db_str(),
            m.stripes
        ));
    }

    Ok(())
}
