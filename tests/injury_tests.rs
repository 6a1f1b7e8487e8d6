use chrono::NaiveDate;
use rmatlog::core::injury::{InjuryCheck, InjuryLogic, parse_injury_spec};
use rmatlog::errors::AppError;
use rmatlog::models::injury::Severity;
use std::env;
use std::fs;

mod common;
use common::memory_store;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}

fn state_path(name: &str) -> std::path::PathBuf {
    let p = env::temp_dir().join(format!("{}_injury_check.json", name));
    fs::remove_file(&p).ok();
    p
}

#[test]
fn injury_spec_parsing() {
    let i = parse_injury_spec(" knee : sprain : Moderate ").unwrap();
    assert_eq!(i.body_part, "knee");
    assert_eq!(i.injury_type, "sprain");
    assert_eq!(i.severity, Severity::Moderate);

    for bad in ["knee", "knee:sprain", ":sprain:mild", "knee:sprain:awful", "a:b:mild:x"] {
        assert!(parse_injury_spec(bad).unwrap_err().is_validation(), "{bad}");
    }
}

#[test]
fn report_then_resolve() {
    let (pool, s) = memory_store();
    let id = InjuryLogic::report(&pool.conn, s.trainee, &parse_injury_spec("finger:jammed:mild").unwrap())
        .unwrap();

    let active = InjuryLogic::active(&pool.conn, s.trainee).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);
    assert!(active[0].session_id.is_none());
    assert!(InjuryLogic::active(&pool.conn, s.partner).unwrap().is_empty());

    InjuryLogic::resolve(&pool.conn, s.trainee, id).unwrap();
    assert!(InjuryLogic::active(&pool.conn, s.trainee).unwrap().is_empty());

    assert!(matches!(
        InjuryLogic::resolve(&pool.conn, s.trainee, id).unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[test]
fn only_the_owner_can_resolve() {
    let (pool, s) = memory_store();
    let id = InjuryLogic::report(&pool.conn, s.trainee, &parse_injury_spec("neck:strain:severe").unwrap())
        .unwrap();

    assert!(InjuryLogic::resolve(&pool.conn, s.partner, id).is_err());
    assert_eq!(InjuryLogic::active(&pool.conn, s.trainee).unwrap().len(), 1);
}

#[test]
fn injury_check_runs_once_a_day() {
    let check = InjuryCheck::at(state_path("once_a_day"));

    assert!(check.is_due(1, day(10)));
    check.mark_done(1, day(10)).unwrap();
    assert!(!check.is_due(1, day(10)));
    assert!(check.is_due(1, day(11)));

    // per trainee
    assert!(check.is_due(2, day(10)));

    fs::remove_file(check.path()).ok();
}

#[test]
fn unreadable_state_counts_as_empty() {
    let path = state_path("corrupt");
    fs::write(&path, "{ not json").unwrap();

    let check = InjuryCheck::at(&path);
    assert!(check.is_due(1, day(10)));
    check.mark_done(1, day(10)).unwrap();
    assert!(!check.is_due(1, day(10)));

    fs::remove_file(&path).ok();
}

#[test]
fn state_file_sits_next_to_the_database() {
    let dir = env::temp_dir().join("rmatlog_state_dir");
    let db = dir.join("rmatlog.sqlite");
    let check = InjuryCheck::for_database(&db.to_string_lossy());
    assert_eq!(check.path(), dir.join("injury_check.json"));

    let bare = InjuryCheck::for_database("rmatlog.sqlite");
    assert_eq!(bare.path(), std::path::Path::new("./injury_check.json"));
}
