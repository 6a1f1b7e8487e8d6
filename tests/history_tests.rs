use rmatlog::core::context::Context;
use rmatlog::core::history::{HistoryLogic, SessionEdit};
use rmatlog::core::lifecycle::{SessionController, log_past_session};
use rmatlog::db::{events, rounds, sessions};
use rmatlog::errors::AppError;
use rmatlog::models::category::Category;
use rmatlog::models::direction::Direction;
use rmatlog::models::event::EventTag;
use rmatlog::models::opponent::Opponent;
use rmatlog::models::round::RoundResult;
use rmatlog::models::session::Debrief;
use rmatlog::models::session_type::SessionType;
use rusqlite::Connection;

mod common;
use common::memory_store;

fn past(conn: &Connection, ctx: &Context) -> i64 {
    log_past_session(
        conn,
        ctx,
        "2025-04-02",
        "18:00",
        "20:00",
        SessionType::Gi,
        Debrief::default(),
        false,
    )
    .unwrap()
    .id
}

fn armbar() -> EventTag {
    EventTag::new(
        Category::Submission,
        Direction::Offensive,
        "Armbar",
        Some("Mount".into()),
    )
}

#[test]
fn backfilled_rounds_are_numbered_by_start_time() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);

    let late = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "19:00", "19:06", &Opponent::Solo, None, &[],
    )
    .unwrap();
    assert_eq!(late.seq, 1);

    let early = HistoryLogic::append_finalized_round(
        &pool.conn,
        &ctx,
        id,
        "18:30",
        "18:36",
        &Opponent::Guest {
            name: "Dan".into(),
            belt: None,
        },
        Some(RoundResult::Loss),
        &[armbar()],
    )
    .unwrap();
    assert_eq!(early.seq, 1);
    assert_eq!(early.duration_secs, Some(360));

    let list = rounds::list_for_session(&pool.conn, id).unwrap();
    let seqs: Vec<(i64, i64)> = list.iter().map(|r| (r.id, r.seq)).collect();
    assert_eq!(seqs, vec![(early.id, 1), (late.id, 2)]);
    assert_eq!(events::list_for_round(&pool.conn, early.id).unwrap().len(), 1);
}

#[test]
fn backfill_into_an_open_session_is_rejected() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let mut ctl = SessionController::new(&pool.conn, ctx);
    let id = ctl.check_in(SessionType::Gi).unwrap().id;

    let err = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "10:00", "10:05", &Opponent::Solo, None, &[],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn backfill_round_must_end_after_it_starts() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);

    let err = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "19:00", "19:00", &Opponent::Solo, None, &[],
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert!(rounds::list_for_session(&pool.conn, id).unwrap().is_empty());
}

#[test]
fn other_trainees_cannot_touch_a_session() {
    let (pool, s) = memory_store();
    let id = past(&pool.conn, &s.trainee_ctx());
    let intruder = Context::new(s.partner, s.gym);

    assert!(matches!(
        HistoryLogic::delete_session(&pool.conn, &intruder, id).unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        HistoryLogic::append_finalized_round(
            &pool.conn, &intruder, id, "18:10", "18:15", &Opponent::Solo, None, &[],
        )
        .unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[test]
fn deleting_a_round_closes_the_gap() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);

    let mut ids = Vec::new();
    for (from, to) in [("18:10", "18:15"), ("18:20", "18:25"), ("18:30", "18:35")] {
        ids.push(
            HistoryLogic::append_finalized_round(
                &pool.conn, &ctx, id, from, to, &Opponent::Solo, None, &[],
            )
            .unwrap()
            .id,
        );
    }

    HistoryLogic::delete_round(&pool.conn, &ctx, ids[1]).unwrap();

    let seqs: Vec<i64> = rounds::list_for_session(&pool.conn, id)
        .unwrap()
        .iter()
        .map(|r| r.seq)
        .collect();
    assert_eq!(seqs, vec![1, 2]);
    assert!(rounds::get_round(&pool.conn, ids[1]).unwrap().is_none());
}

#[test]
fn replacing_events_drops_the_old_set() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);
    let r = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "18:10", "18:15", &Opponent::Solo, None, &[armbar(), armbar()],
    )
    .unwrap();

    let sweep = EventTag::new(Category::Sweep, Direction::Defensive, "Hip bump", None);
    HistoryLogic::replace_round_events(&pool.conn, &ctx, r.id, &[sweep.clone()]).unwrap();

    let stored = events::list_for_round(&pool.conn, r.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].tag, sweep);

    HistoryLogic::replace_round_events(&pool.conn, &ctx, r.id, &[]).unwrap();
    assert!(events::list_for_round(&pool.conn, r.id).unwrap().is_empty());
}

#[test]
fn running_round_cannot_be_edited() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let mut ctl = SessionController::new(&pool.conn, ctx);
    ctl.check_in(SessionType::Gi).unwrap();
    let round_id = ctl.start_round().unwrap().id;

    let err = HistoryLogic::update_round_outcome(
        &pool.conn,
        &ctx,
        round_id,
        &Opponent::Solo,
        Some(RoundResult::Win),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn outcome_update_changes_opponent_and_result() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);
    let r = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "18:10", "18:15", &Opponent::Solo, None, &[],
    )
    .unwrap();

    let partner = Opponent::Member {
        member_id: s.partner,
    };
    HistoryLogic::update_round_outcome(&pool.conn, &ctx, r.id, &partner, Some(RoundResult::Win))
        .unwrap();

    let r = rounds::get_round(&pool.conn, r.id).unwrap().unwrap();
    assert_eq!(r.opponent, partner);
    assert_eq!(r.result, Some(RoundResult::Win));
}

#[test]
fn session_edit_updates_only_given_fields() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);

    let edit = SessionEdit {
        energy: Some(2),
        end: Some("19:00".into()),
        ..Default::default()
    };
    let updated = HistoryLogic::update_session(&pool.conn, &ctx, id, &edit).unwrap();
    assert_eq!(updated.energy, Some(2));
    assert_eq!(updated.duration_minutes(), Some(60));
    assert_eq!(updated.session_type, SessionType::Gi);

    let stored = sessions::get_session(&pool.conn, id).unwrap().unwrap();
    assert_eq!(stored.duration_minutes(), Some(60));
}

#[test]
fn session_edit_rejects_bad_input() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);

    let empty = HistoryLogic::update_session(&pool.conn, &ctx, id, &SessionEdit::default());
    assert!(empty.unwrap_err().is_validation());

    let inverted = SessionEdit {
        start: Some("21:00".into()),
        ..Default::default()
    };
    assert!(
        HistoryLogic::update_session(&pool.conn, &ctx, id, &inverted)
            .unwrap_err()
            .is_validation()
    );

    let energy = SessionEdit {
        energy: Some(0),
        ..Default::default()
    };
    assert!(
        HistoryLogic::update_session(&pool.conn, &ctx, id, &energy)
            .unwrap_err()
            .is_validation()
    );
}

#[test]
fn deleting_a_session_cascades() {
    let (pool, s) = memory_store();
    let ctx = s.trainee_ctx();
    let id = past(&pool.conn, &ctx);
    let r = HistoryLogic::append_finalized_round(
        &pool.conn, &ctx, id, "18:10", "18:15", &Opponent::Solo, None, &[armbar()],
    )
    .unwrap();

    HistoryLogic::delete_session(&pool.conn, &ctx, id).unwrap();

    assert!(sessions::get_session(&pool.conn, id).unwrap().is_none());
    assert!(rounds::get_round(&pool.conn, r.id).unwrap().is_none());
    assert!(events::list_for_round(&pool.conn, r.id).unwrap().is_empty());
}
