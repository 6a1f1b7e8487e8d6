use crate::db::injuries;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::injury::{Injury, NewInjury, Severity};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "injury_check.json";

/// Parse `body_part:injury_type:severity`, e.g. `knee:sprain:mild`.
pub fn parse_injury_spec(spec: &str) -> AppResult<NewInjury> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    let [part, kind, sev] = parts.as_slice() else {
        return Err(AppError::Validation(format!(
            "Invalid injury '{}': expected part:type:severity",
            spec
        )));
    };

    if part.is_empty() || kind.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid injury '{}': body part and type are required",
            spec
        )));
    }
    let severity = Severity::from_db_str(sev).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid severity '{}': use mild, moderate or severe",
            sev
        ))
    })?;

    Ok(NewInjury {
        body_part: part.to_string(),
        injury_type: kind.to_string(),
        severity,
    })
}

pub struct InjuryLogic;

impl InjuryLogic {
    /// Log an injury outside of a check-out (from the periodic check).
    pub fn report(conn: &Connection, trainee_id: i64, injury: &NewInjury) -> AppResult<i64> {
        let id = injuries::insert_injury(conn, trainee_id, None, injury, &Utc::now())?;
        audit(
            conn,
            "injury",
            &format!("injury #{}", id),
            &format!("{} {} ({})", injury.body_part, injury.injury_type, injury.severity.to_db_str()),
        );
        Ok(id)
    }

    pub fn active(conn: &Connection, trainee_id: i64) -> AppResult<Vec<Injury>> {
        injuries::list_injuries(conn, trainee_id, false)
    }

    pub fn resolve(conn: &Connection, trainee_id: i64, injury_id: i64) -> AppResult<()> {
        if !injuries::resolve_injury(conn, injury_id, trainee_id, &Utc::now())? {
            return Err(AppError::NotFound(format!(
                "No active injury #{} found.",
                injury_id
            )));
        }
        audit(conn, "injury_resolve", &format!("injury #{}", injury_id), "Resolved");
        Ok(())
    }
}

/// Per-trainee "last asked" dates for the injury check, so the prompt shows
/// up at most once a day. Advisory only: an unreadable file counts as empty.
pub struct InjuryCheck {
    path: PathBuf,
}

impl InjuryCheck {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// State file living next to the database file.
    pub fn for_database(db_path: &str) -> Self {
        let dir = Path::new(db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::at(dir.join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, NaiveDate> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn is_due(&self, trainee_id: i64, today: NaiveDate) -> bool {
        match self.load().get(&trainee_id.to_string()) {
            Some(last) => *last < today,
            None => true,
        }
    }

    pub fn mark_done(&self, trainee_id: i64, today: NaiveDate) -> AppResult<()> {
        let mut state = self.load();
        state.insert(trainee_id.to_string(), today);

        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| AppError::Other(format!("injury check state: {e}")))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}
