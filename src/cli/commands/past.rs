use crate::cli::commands::round::print_round_ended;
use crate::cli::commands::{
    build_debrief, open_pool, parse_result, parse_session_type, resolve_opponent, tag_events,
};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::core::history::HistoryLogic;
use crate::core::lifecycle::log_past_session;
use crate::core::tagger::TaggingPolicy;
use crate::core::tracker::RoundTracker;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::formatting::mins2readable;

/// `past` and `past-round`: sessions and rounds entered after the fact.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Past {
            date,
            start,
            end,
            session_type,
            energy,
            note,
            injuries,
            drilled,
            import_curriculum,
        } => {
            let kind = parse_session_type(session_type.as_deref(), cfg)?;
            let debrief = build_debrief(*energy, note.as_deref(), injuries, drilled)?;
            let ctx = Context::from_config(cfg)?;
            let pool = open_pool(cfg)?;

            let s = log_past_session(
                &pool.conn,
                &ctx,
                date,
                start,
                end,
                kind,
                debrief,
                *import_curriculum,
            )?;
            success(format!(
                "Session #{} logged for {} ({}, {}).",
                s.id,
                s.local_date(),
                kind.label(),
                mins2readable(s.duration_minutes().unwrap_or(0), false, false)
            ));
        }
        Commands::PastRound {
            session,
            start,
            end,
            events,
            opponent,
            result,
        } => {
            let result = parse_result(result.as_deref())?;
            let ctx = Context::from_config(cfg)?;
            let pool = open_pool(cfg)?;

            let mut tracker = RoundTracker::new(TaggingPolicy::backfill());
            if opponent.is_some() {
                let roster = Roster::load(&pool.conn, ctx.gym_id)?;
                resolve_opponent(&mut tracker, opponent.as_deref(), &roster)?;
            }
            tag_events(&mut tracker, events)?;

            let r = HistoryLogic::append_finalized_round(
                &pool.conn,
                &ctx,
                *session,
                start,
                end,
                tracker.opponent(),
                result,
                tracker.events(),
            )?;
            print_round_ended(&r, tracker.events().len());
        }
        _ => {}
    }

    Ok(())
}
