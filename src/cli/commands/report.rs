use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::dashboard::{Dashboard, build_dashboard};
use crate::core::calculator::flow::build_flow;
use crate::core::calculator::opponents::opponent_stats;
use crate::core::calculator::percent;
use crate::core::context::Context;
use crate::core::gym::Roster;
use crate::db::leaderboard::load_leaderboard;
use crate::db::{events, rounds, sessions};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREEN, GREY, MAGENTA, RED, RESET, YELLOW};
use crate::utils::date::period_window;
use crate::utils::formatting::{bar, mins2readable, scaled_bar, secs2readable, separator};
use crate::utils::table::Table;

const BAR_WIDTH: usize = 24;
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const TOP_TECHNIQUES: usize = 10;

/// Read-only reports: dashboard, opponents, flow and the gym leaderboard.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let ctx = Context::from_config(cfg)?;
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;

    match cmd {
        Commands::Dashboard { period } => {
            let window = period_window(period.as_deref())?;
            let s = sessions::list_sessions(conn, ctx.trainee_id, ctx.gym_id, window)?;
            let r = rounds::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;
            let e = events::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;

            let d = build_dashboard(&s, &r, &e);
            if d.sessions == 0 {
                info("No sessions found for the selected period.");
                return Ok(());
            }
            print_dashboard(&d, &cfg.separator_char);
        }
        Commands::Opponents { period } => {
            let window = period_window(period.as_deref())?;
            let r = rounds::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;
            let e = events::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;
            let roster = Roster::load(conn, ctx.gym_id)?;

            let stats = opponent_stats(&r, &e, &roster);
            if stats.is_empty() {
                info("No rounds with a partner in the selected period.");
                return Ok(());
            }

            header("Training partners");
            let mut t = Table::new(&["PARTNER", "ROUNDS", "W", "D", "L", "WIN %", "SUBS +/-"]);
            for o in stats {
                let (win, _, _) = o.results.ratios();
                t.add_row(vec![
                    o.label,
                    o.rounds.to_string(),
                    format!("{GREEN}{}{RESET}", o.results.wins),
                    format!("{YELLOW}{}{RESET}", o.results.draws),
                    format!("{RED}{}{RESET}", o.results.losses),
                    format!("{:.0}%", win),
                    format!("{}/{}", o.submissions_for, o.submissions_against),
                ]);
            }
            print!("{}", t.render(&cfg.separator_char));
        }
        Commands::Flow { period } => {
            let window = period_window(period.as_deref())?;
            let e = events::list_for_trainee(conn, ctx.trainee_id, ctx.gym_id, window)?;

            let graph = build_flow(&e);
            if graph.edges.is_empty() {
                info("No mapped transitions in the selected period.");
                return Ok(());
            }

            header("Position flow");
            let max = graph
                .edges
                .iter()
                .map(|x| x.offensive + x.defensive)
                .max()
                .unwrap_or(0);
            for edge in &graph.edges {
                let n = edge.offensive + edge.defensive;
                println!(
                    "{:<16} → {:<16} {}{}{} {} ({} off / {} def)",
                    edge.from,
                    edge.to,
                    CYAN,
                    scaled_bar(n, max, BAR_WIDTH),
                    RESET,
                    n,
                    edge.offensive,
                    edge.defensive
                );
            }
            if graph.unmapped > 0 {
                println!("\n{GREY}{} event(s) without a known transition.{RESET}", graph.unmapped);
            }
        }
        Commands::Leaderboard => {
            let rows = load_leaderboard(conn, ctx.gym_id)?;
            if rows.is_empty() {
                info("Nobody has trained this month yet.");
                return Ok(());
            }

            header("This month on the mats");
            let mut t = Table::new(&["#", "NAME", "SESSIONS", "DAYS", "MAT TIME", "GI/NOGI/OPEN"]);
            for (i, row) in rows.iter().enumerate() {
                let name = if row.trainee_id == ctx.trainee_id {
                    format!("{MAGENTA}{}{RESET}", row.name)
                } else {
                    row.name.clone()
                };
                t.add_row(vec![
                    (i + 1).to_string(),
                    name,
                    row.sessions.to_string(),
                    row.unique_days.to_string(),
                    mins2readable(row.minutes, false, false),
                    format!("{}/{}/{}", row.gi_sessions, row.nogi_sessions, row.open_mat_sessions),
                ]);
            }
            print!("{}", t.render(&cfg.separator_char));
        }
        _ => {}
    }

    Ok(())
}

fn print_dashboard(d: &Dashboard, separator_char: &str) {
    header("Dashboard");

    println!("Sessions:        {}", d.sessions);
    println!("Mat time:        {}", mins2readable(d.total_minutes, false, false));
    println!("Avg session:     {}", mins2readable(d.avg_session_minutes.round() as i64, false, false));
    println!("Rounds:          {}", d.rounds);
    println!("Avg round:       {}", secs2readable(d.avg_round_secs.round() as i64));
    if let Some(e) = d.avg_energy {
        println!("Avg energy:      {:.1}/5", e);
    }

    println!("\n{}", separator(separator_char, 50));
    for (kind, n) in &d.by_type {
        println!(
            "{:<10} {}{}{} {:>3} ({:.0}%)",
            kind.label(),
            CYAN,
            bar(percent(*n, d.sessions), BAR_WIDTH),
            RESET,
            n,
            percent(*n, d.sessions)
        );
    }

    println!("\n{}", separator(separator_char, 50));
    let max_day = d.weekdays.iter().copied().max().unwrap_or(0);
    for (label, n) in WEEKDAYS.iter().zip(d.weekdays.iter()) {
        println!("{:<10} {}{}{} {:>3}", label, CYAN, scaled_bar(*n, max_day, BAR_WIDTH), RESET, n);
    }

    if !d.months.is_empty() {
        println!("\n{}", separator(separator_char, 50));
        for m in &d.months {
            let change = match m.change {
                Some(c) if c > 0 => format!("{GREEN}+{}{RESET}", c),
                Some(c) if c < 0 => format!("{RED}{}{RESET}", c),
                Some(_) => "=".to_string(),
                None => String::new(),
            };
            println!(
                "{}  {:>3} session(s)  {}  {}",
                m.month,
                m.sessions,
                mins2readable(m.minutes, false, true),
                change
            );
        }
    }

    if d.rounds > 0 {
        let (w, dr, l) = d.results.ratios();
        println!("\n{}", separator(separator_char, 50));
        println!(
            "Results: {GREEN}{} W ({:.0}%){RESET}  {YELLOW}{} D ({:.0}%){RESET}  {RED}{} L ({:.0}%){RESET}  {GREY}{} unrecorded{RESET}",
            d.results.wins, w, d.results.draws, dr, d.results.losses, l, d.results.unrecorded
        );
    }

    if !d.techniques.is_empty() {
        println!();
        let mut t = Table::new(&["CATEGORY", "TECHNIQUE", "OFF", "DEF", "TOTAL"]);
        for tc in d.techniques.iter().take(TOP_TECHNIQUES) {
            t.add_row(vec![
                tc.category.to_string(),
                tc.technique.clone(),
                tc.offensive.to_string(),
                tc.defensive.to_string(),
                tc.total().to_string(),
            ]);
        }
        print!("{}", t.render(separator_char));
    }
}
