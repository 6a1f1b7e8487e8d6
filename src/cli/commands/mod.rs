pub mod backup;
pub mod checkin;
pub mod checkout;
pub mod config;
pub mod curriculum;
pub mod db;
pub mod export;
pub mod gym;
pub mod init;
pub mod injury;
pub mod live;
pub mod log;
pub mod member;
pub mod past;
pub mod promote;
pub mod report;
pub mod round;
pub mod session;
pub mod status;
pub mod weight;

use crate::config::Config;
use crate::core::gym::Roster;
use crate::core::injury::parse_injury_spec;
use crate::core::tagger::parse_event_spec;
use crate::core::tracker::{OpponentSelection, RoundTracker, TapOutcome};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::belt::Belt;
use crate::models::category::Category;
use crate::models::curriculum::CurriculumTechnique;
use crate::models::drilled::NewDrilled;
use crate::models::opponent::Opponent;
use crate::models::round::RoundResult;
use crate::models::session::Debrief;
use crate::models::session_type::SessionType;

/// Open the configured database, bringing the schema up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    if cfg.database.trim().is_empty() {
        return Err(AppError::Config("database path is empty".into()));
    }
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

pub(crate) fn parse_session_type(raw: Option<&str>, cfg: &Config) -> AppResult<SessionType> {
    match raw {
        None => Ok(cfg.session_type()),
        Some(s) => SessionType::from_code(s).ok_or_else(|| {
            AppError::Validation(format!("Invalid session type '{}': use gi, nogi or open_mat", s))
        }),
    }
}

pub(crate) fn parse_result(raw: Option<&str>) -> AppResult<Option<RoundResult>> {
    raw.map(|r| {
        RoundResult::from_db_str(r)
            .ok_or_else(|| AppError::Validation(format!("Invalid result '{}': use win, draw or loss", r)))
    })
    .transpose()
}

pub(crate) fn parse_belt(raw: &str) -> AppResult<Belt> {
    Belt::from_db_str(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid belt '{}': use white, blue, purple, brown or black",
            raw
        ))
    })
}

/// `member:ID`, `contact:ID`, `guest:NAME[:BELT]` or `solo`.
pub(crate) fn parse_opponent(raw: &str) -> AppResult<OpponentSelection> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("solo") || raw.eq_ignore_ascii_case("none") {
        return Ok(OpponentSelection::None);
    }

    let invalid = || {
        AppError::Validation(format!(
            "Invalid opponent '{}': use member:ID, contact:ID, guest:NAME[:BELT] or solo",
            raw
        ))
    };
    let (kind, rest) = raw.split_once(':').ok_or_else(invalid)?;

    match kind.to_lowercase().as_str() {
        "member" => Ok(OpponentSelection::Member(rest.trim().parse().map_err(|_| invalid())?)),
        "contact" => Ok(OpponentSelection::Contact(rest.trim().parse().map_err(|_| invalid())?)),
        "guest" => {
            // a trailing `:word` is a belt only when it names one
            let (name, belt) = match rest
                .rsplit_once(':')
                .and_then(|(n, b)| Belt::from_db_str(b).map(|belt| (n, belt)))
            {
                Some((n, belt)) => (n, Some(belt)),
                None => (rest, None),
            };
            Ok(OpponentSelection::Guest {
                name: name.trim().to_string(),
                belt,
            })
        }
        _ => Err(invalid()),
    }
}

/// `category:name`, shared by drilled entries and curriculum techniques.
fn parse_category_name(raw: &str) -> AppResult<(Category, String)> {
    let (cat, name) = raw.split_once(':').ok_or_else(|| {
        AppError::Validation(format!("Invalid technique '{}': expected category:name", raw))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Technique name cannot be empty.".into()));
    }
    Ok((Category::parse(cat), name.to_string()))
}

pub(crate) fn parse_drilled(raw: &str) -> AppResult<NewDrilled> {
    let (category, name) = parse_category_name(raw)?;
    Ok(NewDrilled {
        category,
        name,
        curriculum_id: None,
    })
}

pub(crate) fn parse_curriculum_technique(raw: &str) -> AppResult<CurriculumTechnique> {
    let (category, name) = parse_category_name(raw)?;
    Ok(CurriculumTechnique { category, name })
}

/// Parse every debrief field up front so nothing is written on bad input.
pub(crate) fn build_debrief(
    energy: Option<u8>,
    note: Option<&str>,
    injuries: &[String],
    drilled: &[String],
) -> AppResult<Debrief> {
    Ok(Debrief {
        energy,
        note: note.map(str::to_string),
        injuries: injuries
            .iter()
            .map(|s| parse_injury_spec(s))
            .collect::<AppResult<_>>()?,
        drilled: drilled
            .iter()
            .map(|s| parse_drilled(s))
            .collect::<AppResult<_>>()?,
    })
}

/// Feed `dir:cat:tech[@pos]` specs through a tracker, answering the
/// position prompt from the `@position` suffix, if any.
pub(crate) fn tag_events(tracker: &mut RoundTracker, specs: &[String]) -> AppResult<()> {
    for spec in specs {
        let (direction, category, technique, position) = parse_event_spec(spec)?;
        tracker.set_direction(direction);
        if tracker.tap_technique(category, &technique)? == TapOutcome::AwaitingPosition {
            match position.as_deref() {
                Some(p) => tracker.confirm_position(p)?,
                None => tracker.skip_position()?,
            };
        }
    }
    Ok(())
}

/// Resolve an optional `--opponent` against the roster; without one the
/// tracker keeps its current opponent.
pub(crate) fn resolve_opponent(
    tracker: &mut RoundTracker,
    raw: Option<&str>,
    roster: &Roster,
) -> AppResult<Opponent> {
    if let Some(r) = raw {
        tracker.set_opponent(parse_opponent(r)?, roster)?;
    }
    Ok(tracker.opponent().clone())
}
