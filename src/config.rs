//! Application configuration constants
//!
//! Centralized configuration for the reminder list.

use crate::error::{AppError, AppResult};
use std::path::PathBuf;

/// Blob store key under which the whole reminder collection is kept
pub const REMINDERS_KEY: &str = "reminders";

/// Directory created under the platform's local data dir
pub const APP_DIR_NAME: &str = "ReminderApp";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "REMINDER_DATA_DIR";

/// Days shown in the date strip before today
pub const DEFAULT_DAYS_BEFORE: u32 = 30;

/// Days shown in the date strip after today
pub const DEFAULT_DAYS_AFTER: u32 = 30;

/// Date strip cell label, e.g. "07 Mar"
pub const DATE_STRIP_FORMAT: &str = "%d %b";

/// Header label, e.g. "Fri, 07 March"
pub const HEADER_DATE_FORMAT: &str = "%a, %d %B";

/// Short time label, e.g. "09:30"
pub const TIME_FORMAT: &str = "%H:%M";

/// Runtime settings resolved at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub days_before: u32,
    pub days_after: u32,
}

impl Settings {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            days_before: DEFAULT_DAYS_BEFORE,
            days_after: DEFAULT_DAYS_AFTER,
        }
    }

    /// Resolve the data directory from `REMINDER_DATA_DIR`, falling back to
    /// the platform local data dir.
    pub fn from_env() -> AppResult<Self> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_local_dir()
                .ok_or_else(|| AppError::storage("Failed to get local data dir"))?
                .join(APP_DIR_NAME),
        };
        Ok(Self::new(data_dir))
    }
}
