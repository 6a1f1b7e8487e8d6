use crate::cli::commands::{open_pool, parse_curriculum_technique};
use crate::cli::parser::{Commands, CurriculumAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::GymLogic;
use crate::db::curriculum;
use crate::errors::{AppError, AppResult};
use crate::models::curriculum::CurriculumPost;
use crate::ui::messages::{info, success};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Curriculum { action } = cmd {
        let ctx = Context::from_config(cfg)?;
        let pool = open_pool(cfg)?;

        match action {
            CurriculumAction::Post {
                date: day,
                title,
                notes,
                techniques,
            } => {
                let day = match day {
                    Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                    None => date::today(),
                };
                let techniques = techniques
                    .iter()
                    .map(|t| parse_curriculum_technique(t))
                    .collect::<AppResult<Vec<_>>>()?;

                let id = GymLogic::post_curriculum(&pool.conn, &ctx, day, title, notes.as_deref(), &techniques)?;
                success(format!(
                    "Curriculum #{} posted for {} ({} technique(s))",
                    id,
                    day,
                    techniques.len()
                ));
            }
            CurriculumAction::List => {
                let posts = curriculum::list_posts(&pool.conn, ctx.gym_id)?;
                if posts.is_empty() {
                    info("No curriculum posted yet.");
                    return Ok(());
                }
                for p in &posts {
                    print_post(p);
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn print_post(p: &CurriculumPost) {
    println!("📅 {}  #{}  {}", p.date, p.id, p.title);
    if let Some(n) = &p.notes {
        println!("     {}", n);
    }
    for t in &p.techniques {
        println!("     • {} ({})", t.name, t.category);
    }
}
