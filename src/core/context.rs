use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Identity every core operation acts on behalf of.
///
/// Built once per command from the configuration and CLI overrides, then
/// passed explicitly instead of being read from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub trainee_id: i64,
    pub gym_id: i64,
}

impl Context {
    pub fn new(trainee_id: i64, gym_id: i64) -> Self {
        Self {
            trainee_id,
            gym_id,
        }
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let trainee_id = Self::trainee_from_config(cfg)?;
        let gym_id = cfg.gym.ok_or_else(|| {
            AppError::Config(
                "no gym selected: pass --gym <id> or set `gym` in the configuration".into(),
            )
        })?;
        Ok(Self::new(trainee_id, gym_id))
    }

    /// Commands that do not need a gym (joining one, logging weight, ...).
    pub fn trainee_from_config(cfg: &Config) -> AppResult<i64> {
        cfg.trainee.ok_or_else(|| {
            AppError::Config(
                "no trainee selected: pass --trainee <id> or set `trainee` in the configuration"
                    .into(),
            )
        })
    }
}
