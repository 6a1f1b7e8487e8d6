use crate::cli::commands::{open_pool, parse_opponent, parse_result, resolve_opponent, tag_events};
use crate::cli::parser::{Commands, RoundAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::core::history::HistoryLogic;
use crate::core::lifecycle::SessionController;
use crate::core::tagger::TaggingPolicy;
use crate::core::tracker::RoundTracker;
use crate::errors::AppResult;
use crate::models::round::Round;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_result};
use crate::utils::formatting::secs2readable;
use crate::utils::time::local_hhmm;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Round { action } = cmd {
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;
        let conn = &pool.conn;

        match action {
            RoundAction::Start => {
                let mut ctl = SessionController::resume(conn, ctx)?;
                let r = ctl.start_round()?;
                success(format!(
                    "Round {} started at {} ({} min).",
                    r.seq,
                    local_hhmm(&r.started_at),
                    cfg.round_minutes
                ));
            }
            RoundAction::End {
                events,
                opponent,
                result,
                skip,
            } => {
                let result = parse_result(result.as_deref())?;
                let mut ctl = SessionController::resume(conn, ctx)?;

                if opponent.is_some() {
                    let roster = Roster::load(conn, ctx.gym_id)?;
                    resolve_opponent(ctl.tracker_mut(), opponent.as_deref(), &roster)?;
                }
                tag_events(ctl.tracker_mut(), events)?;
                let logged = if *skip { 0 } else { ctl.tracker().events().len() };

                let r = ctl.end_round(result, *skip)?;
                print_round_ended(&r, logged);
            }
            RoundAction::Edit {
                id,
                events,
                clear_events,
                opponent,
                result,
            } => {
                let (round, _) = HistoryLogic::owned_round(conn, &ctx, *id)?;
                let mut changed = false;

                if !events.is_empty() || *clear_events {
                    let mut tracker = RoundTracker::new(TaggingPolicy::history());
                    tag_events(&mut tracker, events)?;
                    HistoryLogic::replace_round_events(conn, &ctx, *id, tracker.events())?;
                    changed = true;
                }

                if opponent.is_some() || result.is_some() {
                    let new_opponent = match opponent.as_deref() {
                        Some(raw) => {
                            let roster = Roster::load(conn, ctx.gym_id)?;
                            let mut tracker = RoundTracker::new(TaggingPolicy::history());
                            tracker.set_opponent(parse_opponent(raw)?, &roster)?;
                            tracker.opponent().clone()
                        }
                        None => round.opponent.clone(),
                    };
                    let new_result = match result.as_deref() {
                        Some(_) => parse_result(result.as_deref())?,
                        None => round.result,
                    };
                    HistoryLogic::update_round_outcome(conn, &ctx, *id, &new_opponent, new_result)?;
                    changed = true;
                }

                if changed {
                    success(format!("Round #{} updated.", id));
                } else {
                    info("Nothing to change.");
                }
            }
            RoundAction::Del { id } => {
                HistoryLogic::delete_round(conn, &ctx, *id)?;
                success(format!("Round #{} deleted.", id));
            }
        }
    }

    Ok(())
}

pub(crate) fn print_round_ended(r: &Round, logged: usize) {
    let result = match r.result {
        Some(res) => format!("{}{}{}", color_for_result(r.result), res.to_db_str(), RESET),
        None => "no result".to_string(),
    };
    success(format!(
        "Round {} ended after {}: {}, {} event(s) logged.",
        r.seq,
        secs2readable(r.duration_secs.unwrap_or(0)),
        result,
        logged
    ));
}
