use rmatlog::core::lifecycle::{LifecycleState, SessionController, log_past_session};
use rmatlog::core::tracker::{OpponentSelection, TapOutcome};
use rmatlog::core::gym::{GymLogic, Roster};
use rmatlog::db::{curriculum, events, injuries, rounds, sessions};
use rmatlog::errors::AppError;
use rmatlog::models::category::Category;
use rmatlog::models::curriculum::CurriculumTechnique;
use rmatlog::models::direction::Direction;
use rmatlog::models::drilled::NewDrilled;
use rmatlog::models::injury::{NewInjury, Severity};
use rmatlog::models::opponent::Opponent;
use rmatlog::models::round::RoundResult;
use rmatlog::models::session::Debrief;
use rmatlog::models::session_type::SessionType;
use rmatlog::utils::date;

mod common;
use common::memory_store;

#[test]
fn starts_with_no_active_session() {
    let (pool, s) = memory_store();
    let ctl = SessionController::resume(&pool.conn, s.trainee_ctx()).unwrap();
    assert_eq!(ctl.state(), LifecycleState::NoActiveSession);
    assert!(ctl.elapsed(chrono::Utc::now()).is_none());
}

#[test]
fn second_checkin_is_rejected() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::resume(&pool.conn, s.trainee_ctx()).unwrap();
    ctl.check_in(SessionType::Gi).unwrap();

    let err = ctl.check_in(SessionType::NoGi).unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // a second controller for the same trainee sees the open session too
    let mut other = SessionController::new(&pool.conn, s.trainee_ctx());
    assert!(matches!(
        other.check_in(SessionType::Gi).unwrap_err(),
        AppError::InvalidState(_)
    ));
}

#[test]
fn store_rejects_a_second_open_session() {
    let (pool, s) = memory_store();
    let now = chrono::Utc::now();
    sessions::insert_session(&pool.conn, s.trainee, s.gym, SessionType::Gi, &now, None).unwrap();

    let err = sessions::insert_session(&pool.conn, s.trainee, s.gym, SessionType::Gi, &now, None)
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(!err.is_store());
}

#[test]
fn round_requires_a_session() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    assert!(matches!(
        ctl.start_round().unwrap_err(),
        AppError::InvalidState(_)
    ));
    assert!(matches!(
        ctl.end_round(None, false).unwrap_err(),
        AppError::InvalidState(_)
    ));
}

#[test]
fn rounds_are_numbered_in_order() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();

    assert_eq!(ctl.start_round().unwrap().seq, 1);
    assert_eq!(ctl.state(), LifecycleState::RoundActive);
    assert!(matches!(
        ctl.start_round().unwrap_err(),
        AppError::InvalidState(_)
    ));
    ctl.end_round(Some(RoundResult::Win), false).unwrap();

    assert_eq!(ctl.start_round().unwrap().seq, 2);
    let r = ctl.end_round(None, false).unwrap();
    assert_eq!(r.seq, 2);
    assert!(r.duration_secs.is_some());
    assert_eq!(ctl.state(), LifecycleState::CheckedIn);
}

#[test]
fn end_round_commits_the_buffer() {
    let (pool, s) = memory_store();
    let roster = Roster::load(&pool.conn, s.gym).unwrap();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::NoGi).unwrap();
    ctl.start_round().unwrap();

    let t = ctl.tracker_mut();
    t.set_opponent(OpponentSelection::Member(s.partner), &roster).unwrap();
    assert_eq!(
        t.tap_technique(Category::Submission, "Armbar").unwrap(),
        TapOutcome::AwaitingPosition
    );
    t.confirm_position("Closed guard").unwrap();
    t.set_direction(Direction::Defensive);
    assert_eq!(
        t.tap_technique(Category::Pass, "Knee slice").unwrap(),
        TapOutcome::Logged(1)
    );

    let r = ctl.end_round(Some(RoundResult::Draw), false).unwrap();
    assert_eq!(r.opponent, Opponent::Member { member_id: s.partner });
    assert_eq!(r.result, Some(RoundResult::Draw));

    let stored = events::list_for_round(&pool.conn, r.id).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].tag.technique, "Armbar");
    assert_eq!(stored[0].tag.position.as_deref(), Some("Closed guard"));
    assert_eq!(stored[1].tag.direction, Direction::Defensive);

    // the buffer is gone once committed
    assert!(ctl.tracker().events().is_empty());
    assert_eq!(ctl.tracker().opponent(), &Opponent::Solo);
}

#[test]
fn stored_events_match_the_buffer_for_free_text_labels() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();
    ctl.start_round().unwrap();

    let t = ctl.tracker_mut();
    assert_eq!(
        t.tap_technique(Category::Other("Judo".into()), "Harai goshi").unwrap(),
        TapOutcome::Logged(0)
    );
    // a known name typed as a label is the real category and asks for a position
    assert_eq!(
        t.tap_technique(Category::Other(" Sweep ".into()), "Hip bump").unwrap(),
        TapOutcome::AwaitingPosition
    );
    t.confirm_position("Closed guard").unwrap();

    let buffer = ctl.tracker().events().to_vec();
    assert_eq!(buffer[0].category, Category::Other("judo".into()));
    assert_eq!(buffer[1].category, Category::Sweep);

    let r = ctl.end_round(None, false).unwrap();
    let stored: Vec<_> = events::list_for_round(&pool.conn, r.id)
        .unwrap()
        .into_iter()
        .map(|e| e.tag)
        .collect();
    assert_eq!(stored, buffer);
}

#[test]
fn failed_round_start_leaves_the_controller_untouched() {
    let (pool, s) = memory_store();
    let mut stale = SessionController::new(&pool.conn, s.trainee_ctx());
    stale.check_in(SessionType::Gi).unwrap();

    // another controller opens a round behind the first one's back
    let mut other = SessionController::resume(&pool.conn, s.trainee_ctx()).unwrap();
    other.start_round().unwrap();

    let err = stale.start_round().unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(stale.state(), LifecycleState::CheckedIn);
    assert!(stale.round().is_none());

    let session_id = stale.session().unwrap().id;
    assert_eq!(rounds::count_all(&pool.conn, session_id).unwrap(), 1);
}

#[test]
fn skipped_round_writes_no_events() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();
    ctl.start_round().unwrap();
    ctl.tracker_mut()
        .tap_technique(Category::Takedown, "Double leg")
        .unwrap();

    let r = ctl.end_round(None, true).unwrap();
    assert!(!r.is_open());
    assert!(events::list_for_round(&pool.conn, r.id).unwrap().is_empty());
}

#[test]
fn resume_picks_up_open_session_and_round() {
    let (pool, s) = memory_store();
    let round_id = {
        let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
        ctl.check_in(SessionType::Gi).unwrap();
        ctl.start_round().unwrap().id
    };

    let mut ctl = SessionController::resume(&pool.conn, s.trainee_ctx()).unwrap();
    assert_eq!(ctl.state(), LifecycleState::RoundActive);
    assert_eq!(ctl.round().map(|r| r.id), Some(round_id));

    let r = ctl.end_round(None, false).unwrap();
    assert_eq!(r.id, round_id);
}

#[test]
fn checkout_closes_a_running_round_without_events() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    let session_id = ctl.check_in(SessionType::Gi).unwrap().id;
    let round_id = ctl.start_round().unwrap().id;
    ctl.tracker_mut()
        .tap_technique(Category::Escape, "Bridge and roll")
        .unwrap();

    let closed = ctl.check_out(Debrief::default(), false).unwrap();
    assert_eq!(closed.id, session_id);
    assert!(closed.ended_at.is_some());
    assert_eq!(ctl.state(), LifecycleState::NoActiveSession);

    let r = rounds::get_round(&pool.conn, round_id).unwrap().unwrap();
    assert!(!r.is_open());
    assert!(events::list_for_round(&pool.conn, round_id).unwrap().is_empty());
}

#[test]
fn checkout_writes_the_debrief() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    let id = ctl.check_in(SessionType::OpenMat).unwrap().id;

    let debrief = Debrief {
        energy: Some(4),
        note: Some("  good rolls  ".into()),
        injuries: vec![NewInjury {
            body_part: "knee".into(),
            injury_type: "sprain".into(),
            severity: Severity::Mild,
        }],
        drilled: vec![NewDrilled {
            category: Category::Sweep,
            name: "Scissor sweep".into(),
            curriculum_id: None,
        }],
    };
    let closed = ctl.check_out(debrief, false).unwrap();
    assert_eq!(closed.energy, Some(4));
    assert_eq!(closed.note.as_deref(), Some("good rolls"));

    let hurt = injuries::list_injuries(&pool.conn, s.trainee, false).unwrap();
    assert_eq!(hurt.len(), 1);
    assert_eq!(hurt[0].session_id, Some(id));
    assert_eq!(curriculum::list_drilled(&pool.conn, id).unwrap().len(), 1);
}

#[test]
fn bad_energy_leaves_the_session_open() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    let id = ctl.check_in(SessionType::Gi).unwrap().id;

    let debrief = Debrief {
        energy: Some(6),
        ..Default::default()
    };
    assert!(ctl.check_out(debrief, false).unwrap_err().is_validation());
    assert_eq!(ctl.state(), LifecycleState::CheckedIn);
    assert!(sessions::get_session(&pool.conn, id).unwrap().unwrap().is_open());
}

#[test]
fn skipped_checkout_ignores_the_debrief() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();

    let debrief = Debrief {
        energy: Some(9),
        note: Some("not written".into()),
        ..Default::default()
    };
    let closed = ctl.check_out(debrief, true).unwrap();
    assert!(closed.energy.is_none());
    assert!(closed.note.is_none());
}

#[test]
fn debrief_blocks_new_rounds_until_cancelled() {
    let (pool, s) = memory_store();
    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();
    ctl.start_round().unwrap();

    ctl.begin_debrief().unwrap();
    assert_eq!(ctl.state(), LifecycleState::DebriefPending);
    assert!(ctl.round().is_none());
    assert!(matches!(
        ctl.start_round().unwrap_err(),
        AppError::InvalidState(_)
    ));

    ctl.cancel_debrief();
    assert_eq!(ctl.state(), LifecycleState::CheckedIn);
    assert_eq!(ctl.start_round().unwrap().seq, 2);
}

#[test]
fn checkin_finds_todays_curriculum() {
    let (pool, s) = memory_store();
    GymLogic::post_curriculum(
        &pool.conn,
        &s.owner_ctx(),
        date::today(),
        "Closed guard attacks",
        None,
        &[CurriculumTechnique {
            category: Category::Submission,
            name: "Armbar".into(),
        }],
    )
    .unwrap();

    let mut ctl = SessionController::new(&pool.conn, s.trainee_ctx());
    ctl.check_in(SessionType::Gi).unwrap();
    assert_eq!(
        ctl.curriculum().map(|p| p.title.as_str()),
        Some("Closed guard attacks")
    );
}

#[test]
fn past_session_is_created_closed() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();

    let past = log_past_session(
        &pool.conn,
        &ctx,
        "2025-03-10",
        "18:00",
        "19:30",
        SessionType::NoGi,
        Debrief {
            energy: Some(3),
            ..Default::default()
        },
        false,
    )
    .unwrap();
    assert!(!past.is_open());
    assert_eq!(past.duration_minutes(), Some(90));
    assert_eq!(past.energy, Some(3));

    // nothing is open afterwards
    let ctl = SessionController::resume(&pool.conn, ctx).unwrap();
    assert_eq!(ctl.state(), LifecycleState::NoActiveSession);
}

#[test]
fn past_session_end_must_follow_start() {
    let (pool, s) = memory_store();
    let err = log_past_session(
        &pool.conn,
        &s.trainee_ctx(),
        "2025-03-10",
        "19:30",
        "18:00",
        SessionType::Gi,
        Debrief::default(),
        false,
    )
    .unwrap_err();
    assert!(err.is_validation());

    let list = sessions::list_sessions(&pool.conn, s.trainee, s.gym, None).unwrap();
    assert!(list.is_empty());
}

#[test]
fn past_session_can_import_the_curriculum() {
    let (pool, s) = memory_store();
    let day = chrono::NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    GymLogic::post_curriculum(
        &pool.conn,
        &s.owner_ctx(),
        day,
        "Leg drags",
        Some("from open guard"),
        &[
            CurriculumTechnique {
                category: Category::Pass,
                name: "Leg drag".into(),
            },
            CurriculumTechnique {
                category: Category::Pass,
                name: "Toreando".into(),
            },
        ],
    )
    .unwrap();

    let past = log_past_session(
        &pool.conn,
        &s.trainee_ctx(),
        "2025-03-12",
        "19:00",
        "20:30",
        SessionType::Gi,
        Debrief::default(),
        true,
    )
    .unwrap();

    let drilled = curriculum::list_drilled(&pool.conn, past.id).unwrap();
    assert_eq!(drilled.len(), 2);
    assert!(drilled.iter().all(|d| d.curriculum_id.is_some()));
}
