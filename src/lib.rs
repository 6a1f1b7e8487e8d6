//! rMatlog library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(cmd, cfg),
        Commands::Db { .. } => commands::db::handle(cmd, cfg),
        Commands::Log { .. } => commands::log::handle(cmd, cfg),
        Commands::Backup { .. } => commands::backup::handle(cmd, cfg),
        Commands::Export { .. } => commands::export::handle(cmd, cfg),
        Commands::Member { .. } => commands::member::handle(cmd, cfg),
        Commands::Gym { .. } => commands::gym::handle(cmd, cfg),
        Commands::Curriculum { .. } => commands::curriculum::handle(cmd, cfg),
        Commands::Promote { .. } => commands::promote::handle(cmd, cfg),
        Commands::Checkin { .. } => commands::checkin::handle(cmd, cfg),
        Commands::Round { .. } => commands::round::handle(cmd, cfg),
        Commands::Checkout { .. } => commands::checkout::handle(cmd, cfg),
        Commands::Status => commands::status::handle(cmd, cfg),
        Commands::Live { .. } => commands::live::handle(cmd, cfg),
        Commands::Past { .. } | Commands::PastRound { .. } => commands::past::handle(cmd, cfg),
        Commands::Session { .. } => commands::session::handle(cmd, cfg),
        Commands::Injury { .. } => commands::injury::handle(cmd, cfg),
        Commands::Weight { .. } => commands::weight::handle(cmd, cfg),
        Commands::Dashboard { .. }
        | Commands::Opponents { .. }
        | Commands::Flow { .. }
        | Commands::Leaderboard => commands::report::handle(cmd, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load the configuration once
    let mut cfg = Config::load()?;

    // command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if cli.trainee.is_some() {
        cfg.trainee = cli.trainee;
    }
    if cli.gym.is_some() {
        cfg.gym = cli.gym;
    }

    if cfg.database.trim().is_empty() && !matches!(cli.command, Commands::Init) {
        // reported only: the first store call fails on its own
        ui::messages::error("No database configured: run `rmatlog init` or pass --db <FILE>.");
    }

    dispatch(&cli, &cfg)
}
