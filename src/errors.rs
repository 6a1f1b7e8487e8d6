//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("{0}")]
    Validation(String),

    // ---------------------------
    // Lifecycle / permission errors
    // ---------------------------
    #[error("{0}")]
    InvalidState(String),

    #[error("Not allowed: {0}")]
    NotAllowed(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Input rejected before anything reached the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::InvalidTime(_)
        )
    }

    /// Failure reported by the store itself.
    pub fn is_store(&self) -> bool {
        matches!(self, AppError::Db(_))
    }

    /// Map a unique/primary-key violation to a friendly `Conflict`;
    /// anything else is re-surfaced as a plain store error.
    pub fn from_unique_violation(err: rusqlite::Error, friendly: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(ref f, _) = err
            && f.code == ErrorCode::ConstraintViolation
            && (f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        {
            return AppError::Conflict(friendly.to_string());
        }
        AppError::Db(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
