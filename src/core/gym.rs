use crate::core::context::Context;
use crate::db::log::audit;
use crate::db::{curriculum, gyms, members};
use crate::errors::{AppError, AppResult};
use crate::models::belt::{Belt, MAX_STRIPES};
use crate::models::curriculum::CurriculumTechnique;
use crate::models::gym::Gym;
use crate::models::member::{Member, RosterEntry, RosterKind};
use crate::models::opponent::Opponent;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

/// Read-only snapshot of the people one can roll with at a gym:
/// registered members unioned with offline contacts.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn load(conn: &Connection, gym_id: i64) -> AppResult<Self> {
        let mut entries: Vec<RosterEntry> = members::list_gym_members(conn, gym_id)?
            .into_iter()
            .map(|m| RosterEntry {
                kind: RosterKind::Registered,
                id: m.id,
                name: m.name,
                belt: Some(m.belt),
                stripes: m.stripes,
            })
            .collect();

        entries.extend(
            members::list_contacts(conn, gym_id)?
                .into_iter()
                .map(|c| RosterEntry {
                    kind: RosterKind::Offline,
                    id: c.id,
                    name: c.name,
                    belt: c.belt,
                    stripes: 0,
                }),
        );

        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn member(&self, id: i64) -> Option<&RosterEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == RosterKind::Registered && e.id == id)
    }

    pub fn contact(&self, id: i64) -> Option<&RosterEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == RosterKind::Offline && e.id == id)
    }

    /// Display name of a registered member, if known.
    pub fn member_name(&self, id: i64) -> Option<&str> {
        self.member(id).map(|e| e.name.as_str())
    }

    /// Human label for an opponent, resolving member ids against the snapshot.
    pub fn describe(&self, opponent: &Opponent) -> String {
        match opponent {
            Opponent::Member { member_id } => self
                .member_name(*member_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("member #{}", member_id)),
            Opponent::Guest { name, belt: Some(b) } => format!("{} ({})", name, b.to_db_str()),
            Opponent::Guest { name, belt: None } => name.clone(),
            Opponent::Solo => "solo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Stripe,
    Belt,
}

/// Invite code: up to four letters of the gym name plus a time-based suffix.
pub fn generate_invite_code(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let prefix = if prefix.is_empty() { "GYM".to_string() } else { prefix };

    let now = Utc::now();
    let mut n = (now.timestamp() as u64)
        .wrapping_mul(1_000_003)
        .wrapping_add(now.timestamp_subsec_micros() as u64);

    const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    let mut suffix = String::new();
    for _ in 0..5 {
        suffix.push(ALPHABET[(n % ALPHABET.len() as u64) as usize] as char);
        n /= ALPHABET.len() as u64;
    }

    format!("{}-{}", prefix, suffix)
}

pub struct GymLogic;

impl GymLogic {
    /// Create a gym; the creator becomes its owner and first member.
    pub fn create(conn: &Connection, owner_id: i64, name: &str, code: Option<&str>) -> AppResult<Gym> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Gym name cannot be empty.".into()));
        }
        if members::get_member(conn, owner_id)?.is_none() {
            return Err(AppError::NotFound(format!("Member #{} not found.", owner_id)));
        }

        let code = match code {
            Some(c) if !c.trim().is_empty() => c.trim().to_uppercase(),
            _ => generate_invite_code(name),
        };

        let tx = conn.unchecked_transaction()?;
        let id = gyms::insert_gym(&tx, name, owner_id, &code)?;
        gyms::insert_membership(&tx, id, owner_id)?;
        tx.commit()?;

        audit(conn, "gym_create", &format!("gym #{}", id), &format!("Created gym '{}'", name));

        Ok(Gym {
            id,
            name: name.to_string(),
            owner_id,
            invite_code: code,
        })
    }

    pub fn join(conn: &Connection, member_id: i64, code: &str) -> AppResult<Gym> {
        let gym = gyms::find_by_code(conn, code)?
            .ok_or_else(|| AppError::NotFound(format!("Invalid invite code '{}'.", code.trim())))?;

        gyms::insert_membership(conn, gym.id, member_id)?;

        audit(
            conn,
            "gym_join",
            &format!("gym #{}", gym.id),
            &format!("Member #{} joined '{}'", member_id, gym.name),
        );
        Ok(gym)
    }

    fn owned_gym(conn: &Connection, ctx: &Context) -> AppResult<Gym> {
        let gym = gyms::get_gym(conn, ctx.gym_id)?
            .ok_or_else(|| AppError::NotFound(format!("Gym #{} not found.", ctx.gym_id)))?;
        if !gym.is_owner(ctx.trainee_id) {
            return Err(AppError::NotAllowed(format!(
                "only the owner of '{}' can do this",
                gym.name
            )));
        }
        Ok(gym)
    }

    pub fn add_contact(conn: &Connection, ctx: &Context, name: &str, belt: Option<Belt>) -> AppResult<i64> {
        let gym = Self::owned_gym(conn, ctx)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Contact name cannot be empty.".into()));
        }

        let id = members::insert_contact(conn, gym.id, name, belt)?;
        audit(conn, "contact_add", &format!("contact #{}", id), name);
        Ok(id)
    }

    pub fn post_curriculum(
        conn: &Connection,
        ctx: &Context,
        date: NaiveDate,
        title: &str,
        notes: Option<&str>,
        techniques: &[CurriculumTechnique],
    ) -> AppResult<i64> {
        let gym = Self::owned_gym(conn, ctx)?;
        if title.trim().is_empty() {
            return Err(AppError::Validation("Curriculum title cannot be empty.".into()));
        }

        let id = curriculum::insert_post(conn, gym.id, &date, title.trim(), notes, techniques)?;
        audit(
            conn,
            "curriculum_post",
            &format!("curriculum #{}", id),
            &format!("{} on {}", title.trim(), date),
        );
        Ok(id)
    }

    /// Promotion Day: one more stripe, or the next belt with stripes reset.
    pub fn promote(conn: &Connection, ctx: &Context, member_id: i64, kind: Promotion) -> AppResult<Member> {
        let gym = Self::owned_gym(conn, ctx)?;

        if !gyms::is_member(conn, gym.id, member_id)? {
            return Err(AppError::NotFound(format!(
                "Member #{} is not on the roster of '{}'.",
                member_id, gym.name
            )));
        }
        let mut member = members::get_member(conn, member_id)?
            .ok_or_else(|| AppError::NotFound(format!("Member #{} not found.", member_id)))?;

        match kind {
            Promotion::Stripe => {
                if member.stripes >= MAX_STRIPES {
                    return Err(AppError::Validation(format!(
                        "{} already has {} stripes: promote the belt instead.",
                        member.name, MAX_STRIPES
                    )));
                }
                member.stripes += 1;
            }
            Promotion::Belt => {
                let next = member.belt.next().ok_or_else(|| {
                    AppError::Validation(format!("{} is already a black belt.", member.name))
                })?;
                member.belt = next;
                member.stripes = 0;
            }
        }

        let tx = conn.unchecked_transaction()?;
        members::update_rank(&tx, member.id, member.belt, member.stripes)?;
        members::insert_promotion(&tx, gym.id, member.id, ctx.trainee_id, member.belt, member.stripes)?;
        tx.commit()?;

        audit(
            conn,
            "promote",
            &format!("member #{}", member.id),
            &format!("{} → {} belt, {} stripe(s)", member.name, member.belt.to_db_str(), member.stripes),
        );
        Ok(member)
    }
}
