use rmatlog::cli::commands::live;
use rmatlog::config::Config;
use rmatlog::core::injury::InjuryLogic;
use rmatlog::db::pool::DbPool;
use rmatlog::db::{events, rounds, sessions};
use rmatlog::models::opponent::Opponent;
use rmatlog::models::round::RoundResult;
use rmatlog::models::session_type::SessionType;
use std::io::Cursor;

mod common;
use common::{Seed, memory_store};

fn quiet_config() -> Config {
    Config {
        injury_check: false,
        ..Config::default()
    }
}

/// Feed `script` to the live loop and return what it printed.
fn drive(pool: &DbPool, s: &Seed, script: &str) -> String {
    let mut out = Vec::new();
    live::run(
        &pool.conn,
        s.trainee_ctx(),
        &quiet_config(),
        SessionType::NoGi,
        Cursor::new(script.to_string()),
        &mut out,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn full_session_at_the_mat() {
    let (pool, s) = memory_store();
    let script = format!(
        "start\n\
         tap submission Armbar\n\
         pos Mount\n\
         dir def\n\
         tap sweep Hip bump\n\
         skip\n\
         rm 2\n\
         vs member {}\n\
         end win\n\
         checkout 4 good rolls\n",
        s.partner
    );
    let out = drive(&pool, &s, &script);

    assert!(out.contains("Checked in for No-Gi"), "{out}");
    assert!(out.contains("Round 1 started"));
    assert!(out.contains("From which position?"));
    assert!(out.contains("Removed:"));
    assert!(out.contains("1 event(s) saved"));
    assert!(out.contains("Checked out"));

    let list = sessions::list_sessions(&pool.conn, s.trainee, s.gym, None).unwrap();
    assert_eq!(list.len(), 1);
    let session = &list[0];
    assert!(!session.is_open());
    assert_eq!(session.session_type, SessionType::NoGi);
    assert_eq!(session.energy, Some(4));
    assert_eq!(session.note.as_deref(), Some("good rolls"));

    let rs = rounds::list_for_session(&pool.conn, session.id).unwrap();
    assert_eq!(rs.len(), 1);
    assert_eq!(rs[0].result, Some(RoundResult::Win));
    assert_eq!(
        rs[0].opponent,
        Opponent::Member {
            member_id: s.partner
        }
    );

    let ev = events::list_for_round(&pool.conn, rs[0].id).unwrap();
    assert_eq!(ev.len(), 1);
    assert_eq!(ev[0].tag.technique, "Armbar");
    assert_eq!(ev[0].tag.position.as_deref(), Some("Mount"));
}

#[test]
fn mistakes_are_reported_and_the_loop_goes_on() {
    let (pool, s) = memory_store();
    let out = drive(
        &pool,
        &s,
        "tap pass Toreando\nstart\nrm 0\nfly away\nend maybe\nend --skip\nquit\n",
    );

    assert!(out.contains("No round is running"), "{out}");
    assert!(out.contains("Invalid event number '0'"));
    assert!(out.contains("Unknown command 'fly'"));
    assert!(out.contains("Invalid result 'maybe'"));
    assert!(out.contains("0 event(s) saved"));
    assert!(out.contains("Still checked in"));

    let open = sessions::find_open_session(&pool.conn, s.trainee, s.gym).unwrap();
    assert!(open.is_some());
}

#[test]
fn eof_keeps_the_round_open_and_drops_the_buffer() {
    let (pool, s) = memory_store();
    let out = drive(&pool, &s, "start\ntap pass Toreando\n");
    assert!(out.contains("1 unsaved event(s) dropped"), "{out}");

    let session = sessions::find_open_session(&pool.conn, s.trainee, s.gym)
        .unwrap()
        .unwrap();
    let open = rounds::find_open_round(&pool.conn, session.id).unwrap().unwrap();
    assert!(events::list_for_round(&pool.conn, open.id).unwrap().is_empty());

    // a second run picks the session up again
    let out = drive(&pool, &s, "status\nend\nquit\n");
    assert!(out.contains(&format!("Resuming session #{}", session.id)));
    assert!(out.contains("Round 1:"));
    assert!(out.contains("0 event(s) saved"));
}

#[test]
fn debrief_collects_answers_before_checkout() {
    let (pool, s) = memory_store();
    let out = drive(
        &pool,
        &s,
        "checkout\nstart\nenergy 9\nenergy 3\ninjury knee:sprain:mild\ndrilled pass:Knee slice\ndone\n",
    );
    assert!(out.contains("Debrief:"), "{out}");
    assert!(out.contains("Unknown debrief command 'start'"));
    assert!(out.contains("Checked out"));

    let list = sessions::list_sessions(&pool.conn, s.trainee, s.gym, None).unwrap();
    assert_eq!(list[0].energy, Some(3));

    let injuries = InjuryLogic::active(&pool.conn, s.trainee).unwrap();
    assert_eq!(injuries.len(), 1);
    assert_eq!(injuries[0].session_id, Some(list[0].id));
}

#[test]
fn cancelled_debrief_goes_back_to_the_mat() {
    let (pool, s) = memory_store();
    let out = drive(&pool, &s, "checkout\ncancel\nstart\nend\nquit\n");
    assert!(out.contains("Back on the mat."), "{out}");
    assert!(out.contains("Round 1 started"));

    let session = sessions::find_open_session(&pool.conn, s.trainee, s.gym)
        .unwrap()
        .unwrap();
    assert_eq!(rounds::count_finalized(&pool.conn, session.id).unwrap(), 1);
}
