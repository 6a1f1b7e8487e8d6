//! Check-in → rounds → check-out state machine for one trainee at one gym.
//!
//! Every transition writes to the store first and only updates the in-memory
//! state once the write succeeded, so a failed call leaves the controller
//! exactly where it was.

use crate::core::context::Context;
use crate::core::tracker::RoundTracker;
use crate::db::log::audit;
use crate::db::{curriculum, events, injuries, rounds, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::curriculum::CurriculumPost;
use crate::models::drilled::NewDrilled;
use crate::models::round::{Round, RoundResult};
use crate::models::session::{Debrief, Session};
use crate::models::session_type::SessionType;
use crate::utils::{date, time};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NoActiveSession,
    CheckedIn,
    RoundActive,
    DebriefPending,
}

pub struct SessionController<'a> {
    conn: &'a Connection,
    ctx: Context,
    session: Option<Session>,
    round: Option<Round>,
    tracker: RoundTracker,
    debrief_pending: bool,
    curriculum: Option<CurriculumPost>,
}

impl<'a> SessionController<'a> {
    pub fn new(conn: &'a Connection, ctx: Context) -> Self {
        Self {
            conn,
            ctx,
            session: None,
            round: None,
            tracker: RoundTracker::default(),
            debrief_pending: false,
            curriculum: None,
        }
    }

    /// Pick up an open session (and its open round) left by a previous command.
    pub fn resume(conn: &'a Connection, ctx: Context) -> AppResult<Self> {
        let mut ctl = Self::new(conn, ctx);

        if let Some(s) = sessions::find_open_session(conn, ctx.trainee_id, ctx.gym_id)? {
            ctl.round = rounds::find_open_round(conn, s.id)?;
            ctl.curriculum = Self::match_curriculum(conn, ctx.gym_id, s.local_date());
            ctl.session = Some(s);
        }

        Ok(ctl)
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn state(&self) -> LifecycleState {
        match (&self.session, &self.round) {
            (None, _) => LifecycleState::NoActiveSession,
            (Some(_), _) if self.debrief_pending => LifecycleState::DebriefPending,
            (Some(_), Some(_)) => LifecycleState::RoundActive,
            (Some(_), None) => LifecycleState::CheckedIn,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn tracker(&self) -> &RoundTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut RoundTracker {
        &mut self.tracker
    }

    /// Curriculum posted for the day of the current session, if any.
    pub fn curriculum(&self) -> Option<&CurriculumPost> {
        self.curriculum.as_ref()
    }

    // a missing or unreadable post is never an error
    fn match_curriculum(conn: &Connection, gym_id: i64, day: NaiveDate) -> Option<CurriculumPost> {
        curriculum::find_for_date(conn, gym_id, &day).ok().flatten()
    }

    fn open_session(&self) -> AppResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("You are not checked in.".into()))
    }

    // ---------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------

    pub fn check_in(&mut self, session_type: SessionType) -> AppResult<&Session> {
        if self.session.is_some() {
            return Err(AppError::InvalidState("You are already checked in.".into()));
        }
        if sessions::find_open_session(self.conn, self.ctx.trainee_id, self.ctx.gym_id)?.is_some() {
            return Err(AppError::InvalidState(
                "You are already checked in at this gym.".into(),
            ));
        }

        let now = Utc::now();
        let id = sessions::insert_session(
            self.conn,
            self.ctx.trainee_id,
            self.ctx.gym_id,
            session_type,
            &now,
            None,
        )?;

        audit(
            self.conn,
            "checkin",
            &format!("session #{}", id),
            &format!("Checked in ({})", session_type.to_db_str()),
        );

        let session = Session {
            id,
            trainee_id: self.ctx.trainee_id,
            gym_id: self.ctx.gym_id,
            session_type,
            started_at: now,
            ended_at: None,
            energy: None,
            note: None,
        };
        self.curriculum = Self::match_curriculum(self.conn, self.ctx.gym_id, session.local_date());
        self.tracker.reset();
        self.debrief_pending = false;

        Ok(self.session.insert(session))
    }

    pub fn start_round(&mut self) -> AppResult<&Round> {
        let session_id = self.open_session()?.id;
        if self.debrief_pending {
            return Err(AppError::InvalidState(
                "Check-out is in progress: cancel it to start another round.".into(),
            ));
        }
        if self.round.is_some() {
            return Err(AppError::InvalidState("A round is already running.".into()));
        }

        let seq = rounds::count_finalized(self.conn, session_id)? + 1;
        let now = Utc::now();
        let id = rounds::insert_open_round(self.conn, session_id, seq, &now)?;

        audit(
            self.conn,
            "round_start",
            &format!("round #{}", id),
            &format!("Round {} started in session #{}", seq, session_id),
        );

        self.tracker.reset();
        let round = Round {
            id,
            session_id,
            seq,
            started_at: now,
            ended_at: None,
            opponent: Default::default(),
            result: None,
            duration_secs: None,
        };
        Ok(self.round.insert(round))
    }

    /// Finalize the open round with the tracker's opponent and, unless
    /// `skip` is set, its buffered events. With `skip` nothing from the buffer
    /// is written.
    pub fn end_round(&mut self, result: Option<RoundResult>, skip: bool) -> AppResult<Round> {
        let round_id = self
            .round
            .as_ref()
            .map(|r| r.id)
            .ok_or_else(|| AppError::InvalidState("No round is running.".into()))?;

        let now = Utc::now();
        let opponent = self.tracker.opponent().clone();

        let tx = self.conn.unchecked_transaction()?;
        rounds::finalize_round(&tx, round_id, &now, &opponent, result)?;
        if !skip {
            events::insert_events(&tx, round_id, self.tracker.events())?;
        }
        tx.commit()?;

        let logged = if skip { 0 } else { self.tracker.events().len() };
        audit(
            self.conn,
            "round_end",
            &format!("round #{}", round_id),
            &format!("Round ended, {} event(s) logged", logged),
        );

        self.round = None;
        self.tracker.reset();

        // re-read: the duration is derived by the store
        rounds::get_round(self.conn, round_id)?
            .ok_or_else(|| AppError::NotFound(format!("Round #{} vanished.", round_id)))
    }

    /// Close a round left open without writing its buffer.
    fn force_end_round(&mut self) -> AppResult<()> {
        if let Some(r) = self.round.as_ref() {
            let now = Utc::now();
            rounds::finalize_round(self.conn, r.id, &now, self.tracker.opponent(), None)?;
            audit(
                self.conn,
                "round_end",
                &format!("round #{}", r.id),
                "Round force-closed at check-out",
            );
            self.round = None;
            self.tracker.reset();
        }
        Ok(())
    }

    /// Enter the debrief step; a running round is closed first.
    pub fn begin_debrief(&mut self) -> AppResult<()> {
        self.open_session()?;
        self.force_end_round()?;
        self.debrief_pending = true;
        Ok(())
    }

    pub fn cancel_debrief(&mut self) {
        self.debrief_pending = false;
    }

    pub fn check_out(&mut self, debrief: Debrief, skip: bool) -> AppResult<Session> {
        let session_id = self.open_session()?.id;
        if !skip {
            validate_energy(debrief.energy)?;
        }

        self.force_end_round()?;

        let now = Utc::now();
        let tx = self.conn.unchecked_transaction()?;
        sessions::close_session(&tx, session_id, &now)?;
        if !skip {
            write_debrief(&tx, self.ctx.trainee_id, session_id, &debrief, &now)?;
        }
        tx.commit()?;

        audit(
            self.conn,
            "checkout",
            &format!("session #{}", session_id),
            if skip { "Checked out (debrief skipped)" } else { "Checked out" },
        );

        self.session = None;
        self.round = None;
        self.debrief_pending = false;
        self.curriculum = None;
        self.tracker.reset();

        sessions::get_session(self.conn, session_id)?
            .ok_or_else(|| AppError::NotFound(format!("Session #{} vanished.", session_id)))
    }

    /// Live clock: the open round if any, otherwise the session. Display only.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = match (&self.round, &self.session) {
            (Some(r), _) => r.started_at,
            (None, Some(s)) => s.started_at,
            _ => return None,
        };
        Some((now - start).max(Duration::zero()))
    }
}

pub fn validate_energy(energy: Option<u8>) -> AppResult<()> {
    match energy {
        Some(e) if !(1..=5).contains(&e) => Err(AppError::Validation(format!(
            "Energy must be between 1 and 5 (got {}).",
            e
        ))),
        _ => Ok(()),
    }
}

fn write_debrief(
    conn: &Connection,
    trainee_id: i64,
    session_id: i64,
    debrief: &Debrief,
    now: &DateTime<Utc>,
) -> AppResult<()> {
    let note = debrief
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    sessions::update_debrief(conn, session_id, debrief.energy, note)?;
    for injury in &debrief.injuries {
        injuries::insert_injury(conn, trainee_id, Some(session_id), injury, now)?;
    }
    curriculum::insert_drilled(conn, session_id, &debrief.drilled)?;
    Ok(())
}

/// Combine a local calendar date and a local "HH:MM" into a UTC instant.
pub fn local_timestamp(day: NaiveDate, hhmm: &str) -> AppResult<DateTime<Utc>> {
    let t = time::parse_time(hhmm).ok_or_else(|| AppError::InvalidTime(hhmm.to_string()))?;
    day.and_time(t)
        .and_local_timezone(Local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(format!("{} {} does not exist locally", day, hhmm)))
}

/// Parsed and validated bounds of a session or round entered after the fact.
pub fn parse_interval(day: &str, start: &str, end: &str) -> AppResult<(NaiveDate, DateTime<Utc>, DateTime<Utc>)> {
    let d = date::parse_date(day).ok_or_else(|| AppError::InvalidDate(day.to_string()))?;
    let from = local_timestamp(d, start)?;
    let to = local_timestamp(d, end)?;

    if to <= from {
        return Err(AppError::Validation(format!(
            "End time ({}) must be later than start time ({}).",
            end, start
        )));
    }
    Ok((d, from, to))
}

/// Record a session that already happened. It is created closed and never
/// goes through the live states.
pub fn log_past_session(
    conn: &Connection,
    ctx: &Context,
    day: &str,
    start: &str,
    end: &str,
    session_type: SessionType,
    debrief: Debrief,
    import_curriculum: bool,
) -> AppResult<Session> {
    let (d, from, to) = parse_interval(day, start, end)?;
    validate_energy(debrief.energy)?;

    let mut debrief = debrief;
    if import_curriculum && let Some(post) = curriculum::find_for_date(conn, ctx.gym_id, &d)? {
        debrief
            .drilled
            .extend(post.techniques.iter().map(|t| NewDrilled {
                category: t.category.clone(),
                name: t.name.clone(),
                curriculum_id: Some(post.id),
            }));
    }

    let tx = conn.unchecked_transaction()?;
    let id = sessions::insert_session(&tx, ctx.trainee_id, ctx.gym_id, session_type, &from, Some(&to))?;
    write_debrief(&tx, ctx.trainee_id, id, &debrief, &Utc::now())?;
    tx.commit()?;

    audit(
        conn,
        "past_session",
        &format!("session #{}", id),
        &format!("Logged past session on {} ({} → {})", d, start, end),
    );

    sessions::get_session(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Session #{} vanished.", id)))
}
