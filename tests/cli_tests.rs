mod common;

use common::{as_owner, as_trainee, file_store, rml, setup_test_db, temp_out};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

#[test]
fn test_init_creates_the_database() {
    let db_path = setup_test_db("cli_init");

    rml()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());

    rml()
        .args(["--db", &db_path, "member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No members yet"));
}

#[test]
fn test_member_and_roster() {
    let (db_path, s) = file_store("cli_roster");

    rml()
        .args(["--db", &db_path, "member", "add", "Dora", "--belt", "purple", "--stripes", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("purple belt, 3 stripe(s)"));

    rml()
        .args(["--db", &db_path, "member", "add", "Eli", "--belt", "orange"])
        .assert()
        .failure();

    rml()
        .args(as_owner(&db_path, &s))
        .args(["gym", "contact", "Visiting Dan", "--belt", "brown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline contact"));

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["gym", "roster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carla"))
        .stdout(predicate::str::contains("Visiting Dan"))
        .stdout(predicate::str::contains("Dora").not());
}

#[test]
fn test_contact_is_owner_only() {
    let (db_path, s) = file_store("cli_contact_owner");

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["gym", "contact", "Visiting Dan"])
        .assert()
        .failure();
}

#[test]
fn test_checkin_round_checkout() {
    let (db_path, s) = file_store("cli_lifecycle");
    let me = as_trainee(&db_path, &s);

    rml()
        .args(&me)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not checked in."));

    rml()
        .args(&me)
        .args(["round", "start"])
        .assert()
        .failure();

    rml()
        .args(&me)
        .args(["checkin", "--type", "nogi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in"));

    rml().args(&me).args(["checkin"]).assert().failure();

    rml()
        .args(&me)
        .args(["round", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1 started"));

    let partner = format!("member:{}", s.partner);
    rml()
        .args(&me)
        .args([
            "round",
            "end",
            "--event",
            "off:submission:Armbar@Mount",
            "--event",
            "def:sweep:Hip bump",
            "--opponent",
            &partner,
            "--result",
            "win",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 event(s) logged"));

    rml()
        .args(&me)
        .args(["checkout", "--energy", "7"])
        .assert()
        .failure();

    rml()
        .args(&me)
        .args(["checkout", "--energy", "4", "--note", "tough rounds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked out"));

    rml()
        .args(&me)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not checked in."));

    rml()
        .args(&me)
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No-Gi"));

    rml()
        .args(&me)
        .args(["opponents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carla"));
}

#[test]
fn test_export_sessions_and_events() {
    let (db_path, s) = file_store("cli_export");
    let me = as_trainee(&db_path, &s);

    rml()
        .args(&me)
        .args(["past", "2025-04-02", "--start", "18:00", "--end", "19:30", "--energy", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session #1 logged"));

    rml()
        .args(&me)
        .args([
            "past-round",
            "1",
            "--start",
            "18:40",
            "--end",
            "18:46",
            "--opponent",
            "guest:Dan:purple",
            "--result",
            "loss",
            "--event",
            "def:submission:Triangle@Closed guard",
        ])
        .assert()
        .success();

    let csv_out = temp_out("cli_export_sessions", "csv");
    rml()
        .args(&me)
        .args(["export", "--format", "csv", "--file", &csv_out, "--range", "2025-04"])
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_out).expect("csv written");
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("id,date,start,end,session_type,minutes"));
    let row = lines.next().unwrap();
    assert!(row.contains("2025-04-02"));
    assert!(row.contains(",90,1,0,0,1,3,"));
    assert!(lines.next().is_none());

    let json_out = temp_out("cli_export_events", "json");
    rml()
        .args(&me)
        .args(["export", "--format", "json", "--file", &json_out, "--events"])
        .assert()
        .success();

    let v: Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["technique"], "Triangle");
    assert_eq!(rows[0]["direction"], "defensive");
    assert_eq!(rows[0]["result"], "loss");
    assert_eq!(rows[0]["position"], "Closed guard");
}

#[test]
fn test_export_requires_an_absolute_path() {
    let (db_path, s) = file_store("cli_export_relative");

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["export", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absolute"));
}

#[test]
fn test_promote_needs_exactly_one_flag() {
    let (db_path, s) = file_store("cli_promote");
    let trainee = s.trainee.to_string();

    rml()
        .args(as_owner(&db_path, &s))
        .args(["promote", &trainee])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Choose one of --stripe or --belt."));

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["promote", &trainee, "--stripe"])
        .assert()
        .failure();

    rml()
        .args(as_owner(&db_path, &s))
        .args(["promote", &trainee, "--stripe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bruno"));
}

#[test]
fn test_live_mode_from_stdin() {
    let (db_path, s) = file_store("cli_live");

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["live"])
        .write_stdin("start\ntap submission Armbar\npos Mount\nend win\ncheckout 4 good\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1 done"))
        .stdout(predicate::str::contains("1 event(s) saved"))
        .stdout(predicate::str::contains("Checked out"));

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Armbar"));
}

#[test]
fn test_log_print_shows_operations() {
    let (db_path, s) = file_store("cli_log");

    rml()
        .args(as_trainee(&db_path, &s))
        .args(["checkin"])
        .assert()
        .success();

    rml()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checkin"));
}

#[test]
fn test_missing_identity_is_reported() {
    let (db_path, _) = file_store("cli_no_identity");

    rml()
        .args(["--db", &db_path, "checkin"])
        .assert()
        .failure();
}
