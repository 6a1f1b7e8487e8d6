//! Interactive mat-side mode.
//!
//! One line per action. The event buffer of the running round lives in this
//! process only: leaving with a round open keeps the round in the store but
//! drops whatever was tapped and not yet committed with `end`.

use crate::cli::commands::checkout::report_injury_check;
use crate::cli::commands::{open_pool, parse_belt, parse_drilled, parse_session_type};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::core::injury::parse_injury_spec;
use crate::core::lifecycle::{LifecycleState, SessionController, validate_energy};
use crate::core::tagger::POSITIONS;
use crate::core::tracker::{OpponentSelection, TapOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::direction::Direction;
use crate::models::round::RoundResult;
use crate::models::session::Debrief;
use crate::models::session_type::SessionType;
use crate::utils::colors::{GREEN, GREY, RED, RESET, YELLOW, color_for_direction};
use crate::utils::formatting::secs2readable;
use crate::utils::time::format_elapsed;
use chrono::Utc;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
  start                         start a round
  dir off|def                   direction of the next taps
  tap <category> <technique>    log a technique (submission, sweep, takedown, pass, escape or any label)
  pos <position> | skip         answer the position prompt
  rm <n>                        remove event #n from this round
  vs member <id> | contact <id> | guest <name> [belt] | solo
  events                        show this round's events
  end [win|draw|loss] [--skip]  end the round (--skip: write no events)
  status                        session and round clock
  checkout [--skip | <energy> [note]]
  quit                          leave (the session stays open)";

const DEBRIEF_HELP: &str = "\
  energy <1-5>                  how did it feel
  note <text>                   free note
  injury <part:type:severity>   report an injury
  drilled <category:name>       technique practiced in class
  done                          write the debrief and check out
  skip                          check out without a debrief
  cancel                        back to the mat";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Live { session_type } = cmd {
        let kind = parse_session_type(session_type.as_deref(), cfg)?;
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        run(&pool.conn, ctx, cfg, kind, stdin.lock(), &mut stdout)?;
    }

    Ok(())
}

/// Drive the controller from `input` until quit, EOF or check-out.
pub fn run<R: BufRead, W: Write>(
    conn: &Connection,
    ctx: Context,
    cfg: &Config,
    session_type: SessionType,
    input: R,
    out: &mut W,
) -> AppResult<()> {
    let roster = Roster::load(conn, ctx.gym_id)?;
    let mut ctl = SessionController::resume(conn, ctx)?;

    match ctl.session() {
        Some(s) => writeln!(out, "↩️  Resuming session #{} ({})", s.id, s.session_type.label())?,
        None => {
            let s = ctl.check_in(session_type)?;
            writeln!(out, "✅ Checked in for {} (session #{})", session_type.label(), s.id)?;
        }
    }
    if let Some(post) = ctl.curriculum() {
        writeln!(out, "📅 Today: {}", post.title)?;
    }
    writeln!(out, "Type `help` for commands.")?;

    let mut live = Live {
        ctl,
        roster,
        cfg,
        debrief: Debrief::default(),
        out,
    };

    let mut lines = input.lines();
    loop {
        live.prompt()?;
        let Some(line) = lines.next() else {
            live.leave()?;
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match live.step(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                live.leave()?;
                break;
            }
            Ok(Flow::CheckedOut) => break,
            Err(e) => writeln!(live.out, "{RED}❌ {}{RESET}", e)?,
        }
    }

    Ok(())
}

enum Flow {
    Continue,
    Quit,
    CheckedOut,
}

struct Live<'a, 'w, W: Write> {
    ctl: SessionController<'a>,
    roster: Roster,
    cfg: &'a Config,
    debrief: Debrief,
    out: &'w mut W,
}

impl<W: Write> Live<'_, '_, W> {
    fn prompt(&mut self) -> AppResult<()> {
        let clock = self
            .ctl
            .elapsed(Utc::now())
            .map(|d| format_elapsed(d.num_seconds()))
            .unwrap_or_default();

        let label = match self.ctl.state() {
            LifecycleState::RoundActive => {
                let seq = self.ctl.round().map(|r| r.seq).unwrap_or(0);
                if self.ctl.tracker().is_awaiting_position() {
                    format!("{YELLOW}R{} {} position?{RESET}", seq, clock)
                } else {
                    format!("{GREEN}R{} {}{RESET}", seq, clock)
                }
            }
            LifecycleState::DebriefPending => format!("{YELLOW}debrief{RESET}"),
            _ => format!("{GREY}mat {}{RESET}", clock),
        };
        write!(self.out, "[{}]> ", label)?;
        self.out.flush()?;
        Ok(())
    }

    fn step(&mut self, line: &str) -> AppResult<Flow> {
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((v, r)) => (v.to_lowercase(), r.trim()),
            None => (line.to_lowercase(), ""),
        };

        if self.ctl.state() == LifecycleState::DebriefPending {
            return self.debrief_step(&verb, rest);
        }

        match verb.as_str() {
            "help" | "?" => writeln!(self.out, "{}", HELP)?,
            "start" => {
                let seq = self.ctl.start_round()?.seq;
                writeln!(
                    self.out,
                    "🔔 Round {} started ({} min)",
                    seq, self.cfg.round_minutes
                )?;
            }
            "dir" => {
                self.require_round()?;
                let d = Direction::from_code(rest)
                    .ok_or_else(|| AppError::Validation("Use `dir off` or `dir def`.".into()))?;
                self.ctl.tracker_mut().set_direction(d);
                writeln!(self.out, "Direction: {}", d.to_db_str())?;
            }
            "tap" => self.tap(rest)?,
            "pos" => {
                self.require_round()?;
                let i = self.ctl.tracker_mut().confirm_position(rest)?;
                self.print_event(i)?;
            }
            "skip" => {
                self.require_round()?;
                let i = self.ctl.tracker_mut().skip_position()?;
                self.print_event(i)?;
            }
            "rm" => {
                self.require_round()?;
                let n: usize = rest
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| AppError::Validation(format!("Invalid event number '{}'.", rest)))?;
                let removed = self.ctl.tracker_mut().remove_event(n - 1)?;
                writeln!(self.out, "Removed: {}", removed.describe())?;
            }
            "vs" => {
                self.require_round()?;
                let selection = parse_selection(rest)?;
                let label = {
                    let opp = self.ctl.tracker_mut().set_opponent(selection, &self.roster)?;
                    self.roster.describe(opp)
                };
                writeln!(self.out, "Partner: {}", label)?;
            }
            "events" | "ls" => self.print_buffer()?,
            "end" => self.end(rest)?,
            "status" => self.status()?,
            "checkout" => return self.checkout(rest),
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown command '{}': type `help`.",
                    other
                )));
            }
        }
        Ok(Flow::Continue)
    }

    fn require_round(&self) -> AppResult<()> {
        if self.ctl.state() != LifecycleState::RoundActive {
            return Err(AppError::InvalidState(
                "No round is running: `start` one first.".into(),
            ));
        }
        Ok(())
    }

    fn tap(&mut self, rest: &str) -> AppResult<()> {
        self.require_round()?;
        let (cat, technique) = rest.split_once(char::is_whitespace).ok_or_else(|| {
            AppError::Validation("Usage: tap <category> <technique>".into())
        })?;

        match self
            .ctl
            .tracker_mut()
            .tap_technique(Category::parse(cat), technique)?
        {
            TapOutcome::Logged(i) => self.print_event(i)?,
            TapOutcome::AwaitingPosition => {
                writeln!(
                    self.out,
                    "From which position? `pos <name>` or `skip` ({})",
                    POSITIONS.join(", ")
                )?;
            }
        }
        Ok(())
    }

    fn print_event(&mut self, index: usize) -> AppResult<()> {
        if let Some(e) = self.ctl.tracker().events().get(index) {
            writeln!(
                self.out,
                "{}#{} {}{}",
                color_for_direction(e.direction),
                index + 1,
                e.describe(),
                RESET
            )?;
        }
        Ok(())
    }

    fn print_buffer(&mut self) -> AppResult<()> {
        let opponent = self.roster.describe(self.ctl.tracker().opponent());
        writeln!(self.out, "Partner: {}", opponent)?;
        if self.ctl.tracker().events().is_empty() {
            writeln!(self.out, "{GREY}No events yet.{RESET}")?;
        }
        for i in 0..self.ctl.tracker().events().len() {
            self.print_event(i)?;
        }
        Ok(())
    }

    fn end(&mut self, rest: &str) -> AppResult<()> {
        let mut result = None;
        let mut skip = false;
        for word in rest.split_whitespace() {
            if word == "--skip" {
                skip = true;
            } else {
                result = Some(RoundResult::from_db_str(word).ok_or_else(|| {
                    AppError::Validation(format!("Invalid result '{}': use win, draw or loss", word))
                })?);
            }
        }

        if self.ctl.tracker().is_awaiting_position() {
            writeln!(self.out, "{GREY}Pending technique dropped.{RESET}")?;
        }
        let logged = if skip { 0 } else { self.ctl.tracker().events().len() };
        let r = self.ctl.end_round(result, skip)?;
        writeln!(
            self.out,
            "🏁 Round {} done in {}: {}, {} event(s) saved",
            r.seq,
            secs2readable(r.duration_secs.unwrap_or(0)),
            r.result.map(|x| x.to_db_str()).unwrap_or("no result"),
            logged
        )?;
        Ok(())
    }

    fn status(&mut self) -> AppResult<()> {
        let now = Utc::now();
        let elapsed = self.ctl.elapsed(now).map(|d| d.num_seconds()).unwrap_or(0);
        match self.ctl.round() {
            Some(r) => writeln!(
                self.out,
                "Round {}: {} / {}, {} event(s) buffered",
                r.seq,
                format_elapsed(elapsed),
                format_elapsed(self.cfg.round_minutes * 60),
                self.ctl.tracker().events().len()
            )?,
            None => writeln!(self.out, "On the mat for {}", format_elapsed(elapsed))?,
        }
        Ok(())
    }

    /// `checkout --skip` and `checkout <energy> [note]` close right away;
    /// a bare `checkout` opens the debrief.
    fn checkout(&mut self, rest: &str) -> AppResult<Flow> {
        if rest == "--skip" {
            return self.finish(Debrief::default(), true);
        }
        if !rest.is_empty() {
            let (energy, note) = match rest.split_once(char::is_whitespace) {
                Some((e, n)) => (e, Some(n.trim().to_string())),
                None => (rest, None),
            };
            let energy: u8 = energy
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid energy '{}'.", energy)))?;
            validate_energy(Some(energy))?;
            let debrief = Debrief {
                energy: Some(energy),
                note,
                ..Default::default()
            };
            return self.finish(debrief, false);
        }

        if self.ctl.round().is_some() {
            writeln!(self.out, "{GREY}The running round was closed without events.{RESET}")?;
        }
        self.ctl.begin_debrief()?;
        self.debrief = Debrief::default();
        writeln!(self.out, "📝 Debrief:\n{}", DEBRIEF_HELP)?;
        Ok(Flow::Continue)
    }

    fn debrief_step(&mut self, verb: &str, rest: &str) -> AppResult<Flow> {
        match verb {
            "energy" => {
                let e: u8 = rest
                    .parse()
                    .map_err(|_| AppError::Validation(format!("Invalid energy '{}'.", rest)))?;
                validate_energy(Some(e))?;
                self.debrief.energy = Some(e);
            }
            "note" => self.debrief.note = Some(rest.to_string()),
            "injury" => self.debrief.injuries.push(parse_injury_spec(rest)?),
            "drilled" => self.debrief.drilled.push(parse_drilled(rest)?),
            "done" => {
                let debrief = std::mem::take(&mut self.debrief);
                return self.finish(debrief, false);
            }
            "skip" => return self.finish(Debrief::default(), true),
            "cancel" => {
                self.ctl.cancel_debrief();
                self.debrief = Debrief::default();
                writeln!(self.out, "Back on the mat.")?;
            }
            "help" | "?" => writeln!(self.out, "{}", DEBRIEF_HELP)?,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown debrief command '{}': type `help`.",
                    other
                )));
            }
        }
        Ok(Flow::Continue)
    }

    fn finish(&mut self, debrief: Debrief, skip: bool) -> AppResult<Flow> {
        let trainee = self.ctl.context().trainee_id;
        let s = self.ctl.check_out(debrief, skip)?;
        writeln!(
            self.out,
            "👋 Checked out after {} min (session #{})",
            s.duration_minutes().unwrap_or(0),
            s.id
        )?;
        report_injury_check(self.cfg, trainee);
        Ok(Flow::CheckedOut)
    }

    fn leave(&mut self) -> AppResult<()> {
        let pending = self.ctl.tracker().events().len();
        if self.ctl.round().is_some() && pending > 0 {
            writeln!(
                self.out,
                "{YELLOW}⚠️  {} unsaved event(s) dropped; the round stays open.{RESET}",
                pending
            )?;
        }
        if self.ctl.session().is_some() {
            writeln!(self.out, "Still checked in. Bye!")?;
        }
        Ok(())
    }
}

/// `member <id>`, `contact <id>`, `guest <name...> [belt]` or `solo`.
fn parse_selection(rest: &str) -> AppResult<OpponentSelection> {
    let invalid = || {
        AppError::Validation(
            "Usage: vs member <id> | contact <id> | guest <name> [belt] | solo".into(),
        )
    };
    let mut words = rest.split_whitespace();
    let kind = words.next().ok_or_else(invalid)?.to_lowercase();
    let tail: Vec<&str> = words.collect();

    match kind.as_str() {
        "solo" | "none" => Ok(OpponentSelection::None),
        "member" | "contact" => {
            let id: i64 = tail
                .first()
                .and_then(|w| w.parse().ok())
                .ok_or_else(invalid)?;
            Ok(if kind == "member" {
                OpponentSelection::Member(id)
            } else {
                OpponentSelection::Contact(id)
            })
        }
        "guest" => {
            let (name_words, belt) = match tail.split_last() {
                Some((last, init)) if !init.is_empty() && parse_belt(last).is_ok() => {
                    (init, Some(parse_belt(last)?))
                }
                _ => (tail.as_slice(), None),
            };
            Ok(OpponentSelection::Guest {
                name: name_words.join(" "),
                belt,
            })
        }
        _ => Err(invalid()),
    }
}
