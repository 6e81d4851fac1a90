//! Environment-driven runtime configuration.
//!
//! | Variable              | Meaning                               | Default                          |
//! |-----------------------|---------------------------------------|----------------------------------|
//! | `GRADEBOOK_DB_PATH`   | SQLite database file                  | `<temp_dir>/gradebook.sqlite3`   |
//! | `GRADEBOOK_LOG_LEVEL` | trace, debug, info, warn or error     | [`default_log_level`]            |
//! | `GRADEBOOK_LOG_DIR`   | absolute directory for rolling logs   | unset, file logging disabled     |
//!
//! Blank values count as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "GRADEBOOK_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "GRADEBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "GRADEBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "gradebook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` keeps file logging off.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("gradebook.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed_and_used() {
        let config = config_from(&[
            (DB_PATH_VAR, " /var/lib/gradebook/data.sqlite3 "),
            (LOG_LEVEL_VAR, "warn"),
            (LOG_DIR_VAR, "/var/log/gradebook"),
        ]);
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/gradebook/data.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/gradebook")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(LOG_DIR_VAR, "   "), (LOG_LEVEL_VAR, "")]);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
    }
}
