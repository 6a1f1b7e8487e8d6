//! Retroactive edits and backfill.
//!
//! These work on sessions that are already closed and never go through
//! the live controller, so none of its preconditions apply here.

use crate::core::context::Context;
use crate::core::lifecycle::{local_timestamp, parse_interval, validate_energy};
use crate::db::db_utils::renumber_rounds;
use crate::db::log::audit;
use crate::db::{events, rounds, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::event::EventTag;
use crate::models::opponent::Opponent;
use crate::models::round::{Round, RoundResult};
use crate::models::session::Session;
use crate::models::session_type::SessionType;
use rusqlite::Connection;

/// Fields of a session that can be changed after the fact. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default)]
pub struct SessionEdit {
    pub session_type: Option<SessionType>,
    pub energy: Option<u8>,
    pub note: Option<String>,
    /// Local "HH:MM" on the session's own day.
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SessionEdit {
    pub fn is_empty(&self) -> bool {
        self.session_type.is_none()
            && self.energy.is_none()
            && self.note.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

pub struct HistoryLogic;

impl HistoryLogic {
    /// Load a finished round and check that its session belongs to the caller.
    pub fn owned_round(conn: &Connection, ctx: &Context, round_id: i64) -> AppResult<(Round, Session)> {
        let round = rounds::get_round(conn, round_id)?
            .ok_or_else(|| AppError::NotFound(format!("Round #{} not found.", round_id)))?;
        let session = sessions::get_owned_session(conn, round.session_id, ctx.trainee_id)
            .map_err(|_| AppError::NotFound(format!("Round #{} not found.", round_id)))?;
        if round.is_open() {
            return Err(AppError::InvalidState(format!(
                "Round #{} is still running: end it first.",
                round_id
            )));
        }
        Ok((round, session))
    }

    /// Add an already-finished round to a closed session.
    ///
    /// Rounds of the session are renumbered by start time afterwards, so a
    /// round backfilled "in between" gets the right sequence number.
    pub fn append_finalized_round(
        conn: &Connection,
        ctx: &Context,
        session_id: i64,
        start: &str,
        end: &str,
        opponent: &Opponent,
        result: Option<RoundResult>,
        tags: &[EventTag],
    ) -> AppResult<Round> {
        let session = sessions::get_owned_session(conn, session_id, ctx.trainee_id)?;
        if session.is_open() {
            return Err(AppError::InvalidState(format!(
                "Session #{} is still in progress: use `round start` instead.",
                session_id
            )));
        }

        let day = session.local_date().format("%Y-%m-%d").to_string();
        let (_, from, to) = parse_interval(&day, start, end)?;

        let tx = conn.unchecked_transaction()?;
        let seq = rounds::count_all(&tx, session_id)? + 1;
        let id = rounds::insert_finalized_round(&tx, session_id, seq, &from, &to, opponent, result)?;
        events::insert_events(&tx, id, tags)?;
        renumber_rounds(&tx, session_id)?;
        tx.commit()?;

        audit(
            conn,
            "round_append",
            &format!("round #{}", id),
            &format!("Backfilled round in session #{} with {} event(s)", session_id, tags.len()),
        );

        rounds::get_round(conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("Round #{} not found.", id)))
    }

    /// Replace the whole event set of a round: nothing from before survives.
    pub fn replace_round_events(
        conn: &Connection,
        ctx: &Context,
        round_id: i64,
        tags: &[EventTag],
    ) -> AppResult<()> {
        Self::owned_round(conn, ctx, round_id)?;

        let tx = conn.unchecked_transaction()?;
        let removed = events::delete_for_round(&tx, round_id)?;
        events::insert_events(&tx, round_id, tags)?;
        tx.commit()?;

        audit(
            conn,
            "round_edit",
            &format!("round #{}", round_id),
            &format!("Events replaced ({} → {})", removed, tags.len()),
        );
        Ok(())
    }

    pub fn update_round_outcome(
        conn: &Connection,
        ctx: &Context,
        round_id: i64,
        opponent: &Opponent,
        result: Option<RoundResult>,
    ) -> AppResult<()> {
        Self::owned_round(conn, ctx, round_id)?;
        rounds::update_outcome(conn, round_id, opponent, result)?;

        audit(
            conn,
            "round_edit",
            &format!("round #{}", round_id),
            "Opponent/result updated",
        );
        Ok(())
    }

    /// Delete a round (its events go with it) and close the gap in the
    /// session's sequence numbers.
    pub fn delete_round(conn: &Connection, ctx: &Context, round_id: i64) -> AppResult<()> {
        let (round, _) = Self::owned_round(conn, ctx, round_id)?;

        let tx = conn.unchecked_transaction()?;
        rounds::delete_round(&tx, round_id)?;
        renumber_rounds(&tx, round.session_id)?;
        tx.commit()?;

        audit(
            conn,
            "del",
            &format!("round #{}", round_id),
            &format!("Round {} of session #{} deleted", round.seq, round.session_id),
        );
        Ok(())
    }

    pub fn update_session(
        conn: &Connection,
        ctx: &Context,
        session_id: i64,
        edit: &SessionEdit,
    ) -> AppResult<Session> {
        let mut s = sessions::get_owned_session(conn, session_id, ctx.trainee_id)?;
        if edit.is_empty() {
            return Err(AppError::Validation("Nothing to change.".into()));
        }
        validate_energy(edit.energy)?;

        let day = s.local_date();
        if let Some(start) = &edit.start {
            s.started_at = local_timestamp(day, start)?;
        }
        if let Some(end) = &edit.end {
            if s.is_open() {
                return Err(AppError::InvalidState(
                    "The session is still in progress: check out to end it.".into(),
                ));
            }
            s.ended_at = Some(local_timestamp(day, end)?);
        }
        if let Some(end) = s.ended_at
            && end <= s.started_at
        {
            return Err(AppError::Validation(
                "End time must be later than start time.".into(),
            ));
        }

        if let Some(t) = edit.session_type {
            s.session_type = t;
        }
        if edit.energy.is_some() {
            s.energy = edit.energy;
        }
        if let Some(note) = &edit.note {
            let note = note.trim();
            s.note = if note.is_empty() { None } else { Some(note.to_string()) };
        }

        sessions::update_session(conn, &s)?;
        audit(conn, "edit", &format!("session #{}", s.id), "Session updated");
        Ok(s)
    }

    /// Delete a session; rounds, events and drilled entries cascade.
    pub fn delete_session(conn: &Connection, ctx: &Context, session_id: i64) -> AppResult<()> {
        let s = sessions::get_owned_session(conn, session_id, ctx.trainee_id)?;
        sessions::delete_session(conn, s.id)?;

        audit(
            conn,
            "del",
            &format!("session #{}", s.id),
            &format!("Session of {} deleted", s.local_date()),
        );
        Ok(())
    }
}
