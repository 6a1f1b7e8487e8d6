use crate::errors::{AppError, AppResult};
use crate::models::session_type::SessionType;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Member id the commands act for.
    #[serde(default)]
    pub trainee: Option<i64>,
    /// Gym id the commands act at.
    #[serde(default)]
    pub gym: Option<i64>,
    #[serde(default = "default_session_type")]
    pub default_session_type: String,
    /// Target round length shown next to the live clock.
    #[serde(default = "default_round_minutes")]
    pub round_minutes: i64,
    #[serde(default = "default_injury_check")]
    pub injury_check: bool,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_session_type() -> String {
    "gi".to_string()
}
fn default_round_minutes() -> i64 {
    5
}
fn default_injury_check() -> bool {
    true
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            trainee: None,
            gym: None,
            default_session_type: default_session_type(),
            round_minutes: default_round_minutes(),
            injury_check: default_injury_check(),
            separator_char: default_separator_char(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rmatlog")
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".rmatlog")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rmatlog.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rmatlog.sqlite")
    }

    /// Session type used by `checkin` when none is given.
    pub fn session_type(&self) -> SessionType {
        SessionType::from_code(&self.default_session_type).unwrap_or(SessionType::Gi)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files. Returns the config that
    /// was (or, in test mode, would have been) written.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = crate::utils::path::expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("rmatlog.sqlite"),
        };

        // keep identity from an earlier init
        let mut config = Self::load().unwrap_or_default();
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);
        Ok(config)
    }
}
