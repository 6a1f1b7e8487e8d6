use crate::cli::commands::{open_pool, parse_belt};
use crate::cli::parser::{Commands, MemberAction};
use crate::config::Config;
use crate::core::member::MemberLogic;
use crate::db::members;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_belt};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Member { action } = cmd {
        let pool = open_pool(cfg)?;

        match action {
            MemberAction::Add {
                name,
                belt,
                stripes,
            } => {
                let m = MemberLogic::add(&pool.conn, name, parse_belt(belt)?, *stripes)?;
                success(format!(
                    "Member #{} added: {} ({} belt, {} stripe(s))",
                    m.id,
                    m.name,
                    m.belt.to_db_str(),
                    m.stripes
                ));
            }
            MemberAction::List => {
                let list = members::list_members(&pool.conn)?;
                if list.is_empty() {
                    info("No members yet. Add one with `rmatlog member add <name>`.");
                    return Ok(());
                }

                let mut t = Table::new(&["ID", "NAME", "BELT", "STRIPES"]);
                for m in list {
                    t.add_row(vec![
                        m.id.to_string(),
                        m.name,
                        format!("{}{}{}", color_for_belt(m.belt), m.belt.to_db_str(), RESET),
                        m.stripes.to_string(),
                    ]);
                }
                print!("{}", t.render(&cfg.separator_char));
            }
        }
    }

    Ok(())
}
