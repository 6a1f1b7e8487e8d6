use rmatlog::core::gym::Roster;
use rmatlog::core::tagger::{TaggingPolicy, parse_event_spec};
use rmatlog::core::tracker::{OpponentSelection, RoundTracker, TapOutcome};
use rmatlog::errors::AppError;
use rmatlog::models::belt::Belt;
use rmatlog::models::category::Category;
use rmatlog::models::direction::Direction;
use rmatlog::models::member::{RosterEntry, RosterKind};
use rmatlog::models::opponent::Opponent;

fn roster() -> Roster {
    Roster::from_entries(vec![
        RosterEntry {
            kind: RosterKind::Registered,
            id: 7,
            name: "Carla".into(),
            belt: Some(Belt::Blue),
            stripes: 2,
        },
        RosterEntry {
            kind: RosterKind::Offline,
            id: 3,
            name: "Visiting Dan".into(),
            belt: Some(Belt::Purple),
            stripes: 0,
        },
    ])
}

#[test]
fn submission_waits_for_a_position() {
    let mut t = RoundTracker::new(TaggingPolicy::live());
    assert_eq!(
        t.tap_technique(Category::Submission, "Triangle").unwrap(),
        TapOutcome::AwaitingPosition
    );
    assert!(t.is_awaiting_position());
    assert!(t.events().is_empty());

    assert_eq!(t.confirm_position("  Closed guard ").unwrap(), 0);
    assert_eq!(t.events()[0].position.as_deref(), Some("Closed guard"));
    assert!(!t.is_awaiting_position());
}

#[test]
fn skipping_the_position_still_logs_the_tap() {
    let mut t = RoundTracker::default();
    t.tap_technique(Category::Sweep, "Hip bump").unwrap();
    t.skip_position().unwrap();
    assert_eq!(t.events().len(), 1);
    assert!(t.events()[0].position.is_none());
}

#[test]
fn tap_while_position_pending_is_rejected() {
    let mut t = RoundTracker::default();
    t.tap_technique(Category::Submission, "Kimura").unwrap();

    let err = t.tap_technique(Category::Pass, "Leg drag").unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert!(t.events().is_empty());
}

#[test]
fn position_without_a_pending_tap_is_rejected() {
    let mut t = RoundTracker::default();
    assert!(matches!(
        t.confirm_position("Mount").unwrap_err(),
        AppError::InvalidState(_)
    ));
}

#[test]
fn free_text_categories_log_immediately() {
    let mut t = RoundTracker::default();
    let out = t
        .tap_technique(Category::parse("wrist lock"), "Gable grip wristlock")
        .unwrap();
    assert_eq!(out, TapOutcome::Logged(0));
    assert_eq!(t.events()[0].category, Category::Other("wrist lock".into()));
}

#[test]
fn empty_technique_is_a_validation_error() {
    let mut t = RoundTracker::default();
    assert!(t.tap_technique(Category::Pass, "   ").unwrap_err().is_validation());
}

#[test]
fn direction_applies_to_following_taps() {
    let mut t = RoundTracker::default();
    t.tap_technique(Category::Takedown, "Single leg").unwrap();
    t.set_direction(Direction::Defensive);
    t.tap_technique(Category::Takedown, "Double leg").unwrap();

    assert_eq!(t.events()[0].direction, Direction::Offensive);
    assert_eq!(t.events()[1].direction, Direction::Defensive);
}

#[test]
fn remove_event_corrects_a_mis_tap() {
    let mut t = RoundTracker::default();
    t.tap_technique(Category::Pass, "Toreando").unwrap();
    t.tap_technique(Category::Pass, "Knee slice").unwrap();

    let removed = t.remove_event(0).unwrap();
    assert_eq!(removed.technique, "Toreando");
    assert_eq!(t.events().len(), 1);
    assert!(t.remove_event(5).unwrap_err().is_validation());
}

#[test]
fn opponent_resolution_against_the_roster() {
    let r = roster();
    let mut t = RoundTracker::default();

    t.set_opponent(OpponentSelection::Member(7), &r).unwrap();
    assert_eq!(t.opponent(), &Opponent::Member { member_id: 7 });

    // offline contacts are stored as guests
    t.set_opponent(OpponentSelection::Contact(3), &r).unwrap();
    assert_eq!(
        t.opponent(),
        &Opponent::Guest {
            name: "Visiting Dan".into(),
            belt: Some(Belt::Purple)
        }
    );

    assert!(matches!(
        t.set_opponent(OpponentSelection::Member(99), &r).unwrap_err(),
        AppError::NotFound(_)
    ));

    t.set_opponent(OpponentSelection::None, &r).unwrap();
    assert!(t.opponent().is_solo());
}

#[test]
fn blank_guest_name_is_rejected() {
    let mut t = RoundTracker::default();
    let sel = OpponentSelection::Guest {
        name: "  ".into(),
        belt: None,
    };
    assert!(t.set_opponent(sel, &roster()).unwrap_err().is_validation());
}

#[test]
fn reset_keeps_the_policy() {
    let mut t = RoundTracker::new(TaggingPolicy::backfill());
    t.set_direction(Direction::Defensive);
    t.tap_technique(Category::Takedown, "Ankle pick").unwrap();
    t.reset();

    assert!(t.events().is_empty());
    assert_eq!(t.direction(), Direction::Offensive);
    assert_eq!(t.policy().categories().len(), 3);
}

#[test]
fn backfill_alphabet_treats_passes_as_free_text() {
    let policy = TaggingPolicy::backfill();
    assert!(policy.prompts_position(&Category::Submission));
    assert!(!policy.prompts_position(&Category::Pass));
    assert!(policy.suggestions(&Category::Pass).is_empty());
    assert!(!TaggingPolicy::live().suggestions(&Category::Pass).is_empty());
}

#[test]
fn event_spec_parsing() {
    let (dir, cat, tech, pos) = parse_event_spec("off:submission:Armbar@Closed guard").unwrap();
    assert_eq!(dir, Direction::Offensive);
    assert_eq!(cat, Category::Submission);
    assert_eq!(tech, "Armbar");
    assert_eq!(pos.as_deref(), Some("Closed guard"));

    let (dir, cat, tech, pos) = parse_event_spec("def:other:Wrist lock").unwrap();
    assert_eq!(dir, Direction::Defensive);
    assert_eq!(cat, Category::Other("other".into()));
    assert_eq!(tech, "Wrist lock");
    assert!(pos.is_none());

    assert!(parse_event_spec("armbar").unwrap_err().is_validation());
    assert!(parse_event_spec("up:sweep:Hip bump").unwrap_err().is_validation());
}
