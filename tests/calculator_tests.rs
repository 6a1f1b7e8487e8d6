use chrono::{DateTime, Duration, TimeZone, Utc};
use rmatlog::core::calculator::dashboard::{build_dashboard, technique_counts};
use rmatlog::core::calculator::flow::{build_flow, lookup};
use rmatlog::core::calculator::opponents::{OpponentKey, opponent_stats};
use rmatlog::core::calculator::{ResultTally, percent};
use rmatlog::core::gym::Roster;
use rmatlog::models::belt::Belt;
use rmatlog::models::category::Category;
use rmatlog::models::direction::Direction;
use rmatlog::models::event::{EventTag, RoundEvent};
use rmatlog::models::member::{RosterEntry, RosterKind};
use rmatlog::models::opponent::Opponent;
use rmatlog::models::round::{Round, RoundResult};
use rmatlog::models::session::Session;
use rmatlog::models::session_type::SessionType;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

fn session(id: i64, start: DateTime<Utc>, minutes: Option<i64>, kind: SessionType, energy: Option<u8>) -> Session {
    Session {
        id,
        trainee_id: 1,
        gym_id: 1,
        session_type: kind,
        started_at: start,
        ended_at: minutes.map(|m| start + Duration::minutes(m)),
        energy,
        note: None,
    }
}

fn round(id: i64, session_id: i64, opponent: Opponent, result: Option<RoundResult>, secs: Option<i64>) -> Round {
    let start = at(3, 19);
    Round {
        id,
        session_id,
        seq: id,
        started_at: start,
        ended_at: secs.map(|s| start + Duration::seconds(s)),
        opponent,
        result,
        duration_secs: secs,
    }
}

fn event(id: i64, round_id: i64, category: Category, direction: Direction, technique: &str) -> RoundEvent {
    RoundEvent {
        id,
        round_id,
        tag: EventTag::new(category, direction, technique, None),
    }
}

fn carla() -> Opponent {
    Opponent::Member { member_id: 7 }
}

fn roster() -> Roster {
    Roster::from_entries(vec![RosterEntry {
        kind: RosterKind::Registered,
        id: 7,
        name: "Carla".into(),
        belt: Some(Belt::Blue),
        stripes: 1,
    }])
}

#[test]
fn empty_input_gives_an_empty_dashboard() {
    let d = build_dashboard(&[], &[], &[]);
    assert_eq!(d.sessions, 0);
    assert_eq!(d.total_minutes, 0);
    assert_eq!(d.avg_session_minutes, 0.0);
    assert_eq!(d.avg_round_secs, 0.0);
    assert!(d.avg_energy.is_none());
    assert!(d.months.is_empty());
    assert_eq!(d.weekdays, [0; 7]);
    assert_eq!(d.results, ResultTally::default());
}

#[test]
fn dashboard_totals() {
    let sessions = vec![
        session(1, at(3, 18), Some(90), SessionType::Gi, Some(4)),
        session(2, at(5, 18), Some(60), SessionType::NoGi, Some(2)),
        // still open: counted as a visit, no minutes
        session(3, at(10, 18), None, SessionType::Gi, None),
    ];
    let rounds = vec![
        round(1, 1, carla(), Some(RoundResult::Win), Some(300)),
        round(2, 1, Opponent::Solo, None, Some(240)),
        round(3, 3, carla(), None, None),
    ];

    let d = build_dashboard(&sessions, &rounds, &[]);
    assert_eq!(d.sessions, 3);
    assert_eq!(d.total_minutes, 150);
    assert_eq!(d.avg_session_minutes, 75.0);
    assert_eq!(d.avg_energy, Some(3.0));
    assert_eq!(d.rounds, 2);
    assert_eq!(d.total_round_secs, 540);
    assert_eq!(d.avg_round_secs, 270.0);
    assert_eq!(d.results.wins, 1);
    assert_eq!(d.results.unrecorded, 1);

    let gi = d.by_type.iter().find(|(t, _)| *t == SessionType::Gi).unwrap().1;
    assert_eq!(gi, 2);
    assert_eq!(d.weekdays.iter().sum::<usize>(), 3);
}

#[test]
fn month_buckets_track_the_change() {
    let sessions = vec![
        session(1, Utc.with_ymd_and_hms(2025, 1, 10, 18, 0, 0).unwrap(), Some(60), SessionType::Gi, None),
        session(2, Utc.with_ymd_and_hms(2025, 2, 10, 18, 0, 0).unwrap(), Some(60), SessionType::Gi, None),
        session(3, Utc.with_ymd_and_hms(2025, 2, 12, 18, 0, 0).unwrap(), Some(60), SessionType::Gi, None),
    ];
    let d = build_dashboard(&sessions, &[], &[]);
    assert_eq!(d.months.len(), 2);
    assert_eq!(d.months[0].change, None);
    assert_eq!(d.months[1].sessions, 2);
    assert_eq!(d.months[1].change, Some(1));
}

#[test]
fn empty_months_are_kept_in_the_histogram() {
    let sessions = vec![
        session(1, Utc.with_ymd_and_hms(2024, 12, 15, 18, 0, 0).unwrap(), Some(60), SessionType::Gi, None),
        session(2, Utc.with_ymd_and_hms(2025, 2, 15, 18, 0, 0).unwrap(), Some(90), SessionType::Gi, None),
    ];
    let d = build_dashboard(&sessions, &[], &[]);

    let months: Vec<&str> = d.months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-12", "2025-01", "2025-02"]);
    assert_eq!((d.months[1].sessions, d.months[1].minutes), (0, 0));
    assert_eq!(d.months[1].change, Some(-1));
    assert_eq!(d.months[2].change, Some(1));
}

#[test]
fn technique_counts_split_by_direction() {
    let events = vec![
        event(1, 1, Category::Submission, Direction::Offensive, "Armbar"),
        event(2, 1, Category::Submission, Direction::Defensive, "Armbar"),
        event(3, 2, Category::Submission, Direction::Offensive, "Armbar"),
        event(4, 2, Category::Pass, Direction::Offensive, "Toreando"),
    ];
    let counts = technique_counts(&events);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].technique, "Armbar");
    assert_eq!((counts[0].offensive, counts[0].defensive), (2, 1));
    assert_eq!(counts[1].total(), 1);
}

#[test]
fn result_ratios_ignore_unrecorded_rounds() {
    let mut t = ResultTally::default();
    t.add(Some(RoundResult::Win));
    t.add(Some(RoundResult::Loss));
    t.add(None);
    assert_eq!(t.decided(), 2);
    assert_eq!(t.ratios(), (50.0, 0.0, 50.0));
    assert_eq!(ResultTally::default().ratios(), (0.0, 0.0, 0.0));
    assert_eq!(percent(1, 0), 0.0);
}

#[test]
fn opponent_stats_skip_solo_and_open_rounds() {
    let rounds = vec![
        round(1, 1, carla(), Some(RoundResult::Win), Some(300)),
        round(2, 1, carla(), Some(RoundResult::Loss), Some(300)),
        round(3, 1, Opponent::Solo, Some(RoundResult::Win), Some(300)),
        round(4, 1, carla(), None, None),
        round(
            5,
            2,
            Opponent::Guest {
                name: "Dan ".into(),
                belt: None,
            },
            Some(RoundResult::Draw),
            Some(300),
        ),
        round(
            6,
            2,
            Opponent::Guest {
                name: "dan".into(),
                belt: Some(Belt::Purple),
            },
            None,
            Some(300),
        ),
        round(7, 2, Opponent::Member { member_id: 42 }, None, Some(300)),
    ];
    let events = vec![
        event(1, 1, Category::Submission, Direction::Offensive, "Armbar"),
        event(2, 2, Category::Submission, Direction::Defensive, "Triangle"),
        event(3, 2, Category::Sweep, Direction::Defensive, "Hip bump"),
    ];

    let stats = opponent_stats(&rounds, &events, &roster());
    assert_eq!(stats.len(), 3);

    let c = stats.iter().find(|o| o.key == OpponentKey::Member(7)).unwrap();
    assert_eq!(c.label, "Carla");
    assert_eq!(c.rounds, 2);
    assert_eq!((c.results.wins, c.results.losses), (1, 1));
    assert_eq!((c.submissions_for, c.submissions_against), (1, 1));

    let dan = stats.iter().find(|o| o.key == OpponentKey::Guest("dan".into())).unwrap();
    assert_eq!(dan.rounds, 2);

    let unknown = stats.iter().find(|o| o.key == OpponentKey::Member(42)).unwrap();
    assert_eq!(unknown.label, "Member #42");
}

#[test]
fn flow_maps_known_techniques() {
    assert_eq!(lookup("  Hip Bump "), Some(("Closed guard", "Mount")));
    assert_eq!(lookup("Armbar"), None);

    let events = vec![
        event(1, 1, Category::Sweep, Direction::Offensive, "Scissor sweep"),
        event(2, 1, Category::Sweep, Direction::Defensive, "Hip bump"),
        event(3, 1, Category::Pass, Direction::Offensive, "Toreando"),
        event(4, 1, Category::Submission, Direction::Offensive, "Armbar"),
    ];
    let g = build_flow(&events);
    assert_eq!(g.unmapped, 1);
    assert_eq!(g.edges.len(), 2);

    let top = &g.edges[0];
    assert_eq!((top.from, top.to), ("Closed guard", "Mount"));
    assert_eq!((top.offensive, top.defensive), (1, 1));
}

#[test]
fn flow_of_nothing_is_empty() {
    let g = build_flow(&[]);
    assert!(g.edges.is_empty());
    assert_eq!(g.unmapped, 0);
}
