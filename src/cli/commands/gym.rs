use crate::cli::commands::{open_pool, parse_belt};
use crate::cli::parser::{Commands, GymAction};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::gym::{GymLogic, Roster};
use crate::db::gyms;
use crate::errors::AppResult;
use crate::models::member::RosterKind;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, color_for_belt};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Gym { action } = cmd {
        let pool = open_pool(cfg)?;
        let conn = &pool.conn;

        match action {
            GymAction::Create { name, code } => {
                let owner = Context::trainee_from_config(cfg)?;
                let gym = GymLogic::create(conn, owner, name, code.as_deref())?;
                success(format!(
                    "Gym #{} '{}' created. Invite code: {}",
                    gym.id, gym.name, gym.invite_code
                ));
            }
            GymAction::Join { code } => {
                let member = Context::trainee_from_config(cfg)?;
                let gym = GymLogic::join(conn, member, code)?;
                success(format!("You joined '{}' (gym #{}).", gym.name, gym.id));
            }
            GymAction::List => {
                let member = Context::trainee_from_config(cfg)?;
                let list = gyms::list_gyms_for_member(conn, member)?;
                if list.is_empty() {
                    info("You are not a member of any gym.");
                    return Ok(());
                }
                let mut t = Table::new(&["ID", "NAME", "INVITE", "ROLE"]);
                for g in list {
                    let role = if g.is_owner(member) { "owner" } else { "member" };
                    t.add_row(vec![g.id.to_string(), g.name, g.invite_code, role.to_string()]);
                }
                print!("{}", t.render(&cfg.separator_char));
            }
            GymAction::Roster => {
                let ctx = Context::from_config(cfg)?;
                let roster = Roster::load(conn, ctx.gym_id)?;
                if roster.entries().is_empty() {
                    info("The roster is empty.");
                    return Ok(());
                }
                let mut t = Table::new(&["KIND", "ID", "NAME", "BELT", "STRIPES"]);
                for e in roster.entries() {
                    let kind = match e.kind {
                        RosterKind::Registered => "member",
                        RosterKind::Offline => "contact",
                    };
                    let belt = match e.belt {
                        Some(b) => format!("{}{}{}", color_for_belt(b), b.to_db_str(), RESET),
                        None => format!("{GREY}--{RESET}"),
                    };
                    t.add_row(vec![
                        kind.to_string(),
                        e.id.to_string(),
                        e.name.clone(),
                        belt,
                        e.stripes.to_string(),
                    ]);
                }
                print!("{}", t.render(&cfg.separator_char));
            }
            GymAction::Contact { name, belt } => {
                let ctx = Context::from_config(cfg)?;
                let belt = belt.as_deref().map(parse_belt).transpose()?;
                let id = GymLogic::add_contact(conn, &ctx, name, belt)?;
                success(format!("Offline contact #{} added: {}", id, name.trim()));
            }
        }
    }

    Ok(())
}
