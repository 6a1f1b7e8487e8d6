use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        events,
        force,
    } = cmd
    {
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;
        ExportLogic::export(&pool.conn, &ctx, *format, file, range.as_deref(), *events, *force)?;
    }

    Ok(())
}
