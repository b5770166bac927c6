//! Runtime configuration for the contact book.
//!
//! # Responsibility
//! - Resolve the database file location and logging settings.
//! - Keep the destructive reset path opt-in.
//!
//! # Invariants
//! - `reset_on_open` is `false` unless explicitly requested.
//! - Blank environment values are treated as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CONTACTBOOK_DB_PATH";
pub const RESET_ON_OPEN_ENV: &str = "CONTACTBOOK_RESET_ON_OPEN";
pub const LOG_LEVEL_ENV: &str = "CONTACTBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CONTACTBOOK_LOG_DIR";

const APP_DIR_NAME: &str = "contactbook";
const DB_FILE_NAME: &str = "contactbook.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Settings used to open a [`crate::ContactBook`] and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBookConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Delete the database file before opening it. Maintenance only.
    pub reset_on_open: bool,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl ContactBookConfig {
    /// Builds a config for an explicit database path with defaults elsewhere.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            reset_on_open: false,
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }

    /// Builds a config from `CONTACTBOOK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            reset_on_open: non_blank(RESET_ON_OPEN_ENV)
                .as_deref()
                .is_some_and(parse_flag),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
        }
    }
}

/// Per-user application data directory, falling back to the temp dir on
/// platforms without one.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_db_path() -> PathBuf {
    default_data_dir().join(DB_FILE_NAME)
}

pub fn default_log_dir() -> PathBuf {
    default_data_dir().join(LOG_DIR_NAME)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{
        default_db_path, parse_flag, ContactBookConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV,
        RESET_ON_OPEN_ENV,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> ContactBookConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ContactBookConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_keep_reset_disabled() {
        let config = config_from(&[]);
        assert_eq!(config.db_path, default_db_path());
        assert!(!config.reset_on_open);
        assert!(config.db_path.ends_with("contactbook/contactbook.sqlite3"));
        assert!(config.log_dir.ends_with("contactbook/logs"));
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = config_from(&[
            (DB_PATH_ENV, " /tmp/contacts.db "),
            (RESET_ON_OPEN_ENV, "TRUE"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/tmp/contactbook-logs"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/contacts.db"));
        assert!(config.reset_on_open);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/contactbook-logs"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(DB_PATH_ENV, "   "), (RESET_ON_OPEN_ENV, "")]);
        assert_eq!(config.db_path, default_db_path());
        assert!(!config.reset_on_open);
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values_only() {
        for truthy in ["1", "true", "Yes", "ON"] {
            assert!(parse_flag(truthy), "{truthy} should be truthy");
        }
        for falsy in ["0", "false", "no", "maybe"] {
            assert!(!parse_flag(falsy), "{falsy} should be falsy");
        }
    }

    #[test]
    fn new_uses_given_path_and_disables_reset() {
        let config = ContactBookConfig::new("/data/contacts.sqlite3");
        assert_eq!(config.db_path, PathBuf::from("/data/contacts.sqlite3"));
        assert!(!config.reset_on_open);
    }
}
