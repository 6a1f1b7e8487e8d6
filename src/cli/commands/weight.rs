use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, WeightAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::member::WeightLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, RED, RESET};
use crate::utils::date;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Weight { action } = cmd {
        let trainee = Context::trainee_from_config(cfg)?;
        let pool = open_pool(cfg)?;

        match action {
            WeightAction::Add { kg, date: day } => {
                let day = match day {
                    Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                    None => date::today(),
                };
                WeightLogic::add(&pool.conn, trainee, day, *kg)?;
                success(format!("Weight logged: {:.1} kg on {}", kg, day));
            }
            WeightAction::List => {
                let history = WeightLogic::history(&pool.conn, trainee)?;
                if history.is_empty() {
                    info("No weight entries yet.");
                    return Ok(());
                }
                let mut t = Table::new(&["DATE", "KG", "CHANGE"]);
                for (w, delta) in history {
                    let change = match delta {
                        Some(d) if d > 0.0 => format!("{RED}+{:.1}{RESET}", d),
                        Some(d) if d < 0.0 => format!("{GREEN}{:.1}{RESET}", d),
                        Some(_) => "0.0".to_string(),
                        None => "--".to_string(),
                    };
                    t.add_row(vec![w.date.to_string(), format!("{:.1}", w.kg), change]);
                }
                print!("{}", t.render(&cfg.separator_char));
            }
        }
    }

    Ok(())
}
