use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod schedule;

pub use schedule::ConfigSchedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// Default end of the working day (`HH:MM`); checkouts before it are early.
    #[serde(default = "default_scheduled_end")]
    pub default_scheduled_end: Option<String>,

    /// Per-worker overrides of the scheduled end (`worker id → HH:MM`).
    #[serde(default)]
    pub worker_schedules: BTreeMap<String, String>,

    #[serde(default)]
    pub early_checkout_tolerance_minutes: i64,

    #[serde(default = "default_cooldown_ms")]
    pub dedup_cooldown_ms: i64,

    #[serde(default = "default_accuracy_warning")]
    pub accuracy_warning_meters: f64,

    /// Wall-clock time used by `auto-checkout` when no cutoff is given.
    #[serde(default = "default_auto_checkout_cutoff")]
    pub auto_checkout_cutoff: String,

    #[serde(default = "default_location_timeout")]
    pub location_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_scheduled_end() -> Option<String> {
    Some("18:00".to_string())
}
fn default_cooldown_ms() -> i64 {
    2000
}
fn default_accuracy_warning() -> f64 {
    100.0
}
fn default_auto_checkout_cutoff() -> String {
    "23:59".to_string()
}
fn default_location_timeout() -> u64 {
    20
}
fn default_log_level() -> String {
    "warn".to_string()
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
            default_scheduled_end: default_scheduled_end(),
            worker_schedules: BTreeMap::new(),
            early_checkout_tolerance_minutes: 0,
            dedup_cooldown_ms: default_cooldown_ms(),
            accuracy_warning_meters: default_accuracy_warning(),
            auto_checkout_cutoff: default_auto_checkout_cutoff(),
            location_timeout_secs: default_location_timeout(),
            log_level: default_log_level(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("fieldclock")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".fieldclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fieldclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fieldclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the tracker misbehave at runtime.
    pub fn validate(&self) -> AppResult<()> {
        if self.dedup_cooldown_ms < 0 {
            return Err(AppError::Config(
                "dedup_cooldown_ms must not be negative".into(),
            ));
        }
        if self.early_checkout_tolerance_minutes < 0 {
            return Err(AppError::Config(
                "early_checkout_tolerance_minutes must not be negative".into(),
            ));
        }
        // Parses every HH:MM field.
        ConfigSchedule::from_config(self)?;
        crate::utils::time::parse_time(&self.auto_checkout_cutoff).ok_or_else(|| {
            AppError::Config(format!(
                "auto_checkout_cutoff '{}' is not HH:MM",
                self.auto_checkout_cutoff
            ))
        })?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Initialize configuration directory and file, returning the DB path.
    ///
    /// In test mode the configuration file is left untouched.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if !is_test {
            let config = Self::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();

        assert_eq!(cfg.default_scheduled_end.as_deref(), Some("18:00"));
        assert_eq!(cfg.dedup_cooldown_ms, 2000);
        assert_eq!(cfg.early_checkout_tolerance_minutes, 0);
        assert!(cfg.worker_schedules.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_times() {
        let mut cfg = Config::with_database(PathBuf::from("/tmp/x.sqlite"));
        cfg.auto_checkout_cutoff = "midnight".into();
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));

        let mut cfg = Config::with_database(PathBuf::from("/tmp/x.sqlite"));
        cfg.worker_schedules.insert("w1".into(), "25:00".into());
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }
}
