//! Seeding configuration file
//!
//! JSON, default `./shiftseed.json`. Fixture paths are relative to the
//! directory holding the config file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::observability::Severity;
use crate::schema::EntityKind;
use crate::submit::is_submittable;

use super::errors::CliError;

/// Overrides `password` from the config file when set.
pub const PASSWORD_ENV: &str = "SHIFTSEED_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("base_url must start with http:// or https://, got '{0}'")]
    BaseUrl(String),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("timeout_secs must be > 0")]
    ZeroTimeout,

    #[error("invalid log_level: {0}")]
    LogLevel(String),

    #[error("fixture #{index}: {message}")]
    Fixture { index: usize, message: String },
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::config_error(e.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// One fixture file to load
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    /// Entity kind of every row, e.g. `soldier` or `shift-template`
    pub kind: String,
    pub path: PathBuf,
}

/// A fixture entry after validation
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub kind: EntityKind,
    pub path: PathBuf,
}

/// Configuration file structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Scheme and host of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Register the user before logging in
    #[serde(default)]
    pub register: bool,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Used unless `--log-level` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Loaded in order
    #[serde(default)]
    pub fixtures: Vec<FixtureConfig>,

    /// GET every seeded collection once loading is done
    #[serde(default)]
    pub list_after_seed: bool,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from file, applying the password override.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut config = Self::parse(&content, base_dir)?;
        if let Ok(password) = env::var(PASSWORD_ENV) {
            config.password = password;
        }
        Ok(config)
    }

    /// Parse and validate config text. Relative fixture paths resolve
    /// against `base_dir`.
    pub fn parse(content: &str, base_dir: PathBuf) -> ConfigResult<Self> {
        let mut config: Config = serde_json::from_str(content)?;
        config.base_dir = base_dir;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.base_url.clone()));
        }

        if self.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        self.severity()?;
        self.resolved_fixtures()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::LogLevel)
    }

    /// Fixtures with parsed kinds and resolved paths, in config order.
    pub fn resolved_fixtures(&self) -> ConfigResult<Vec<Fixture>> {
        self.fixtures
            .iter()
            .enumerate()
            .map(|(index, fixture)| {
                let kind: EntityKind = fixture
                    .kind
                    .parse()
                    .map_err(|message| ConfigError::Fixture { index, message })?;
                if !is_submittable(kind) {
                    return Err(ConfigError::Fixture {
                        index,
                        message: format!("entity kind '{}' cannot be submitted on its own", kind),
                    });
                }
                Ok(Fixture {
                    kind,
                    path: self.base_dir.join(&fixture.path),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ConfigResult<Config> {
        Config::parse(text, PathBuf::from("/seed"))
    }

    #[test]
    fn test_defaults() {
        let config = parse(r#"{"username": "john_doe"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert!(!config.register);
        assert!(config.resolved_fixtures().unwrap().is_empty());
    }

    #[test]
    fn test_fixture_paths_resolve_against_config_dir() {
        let config = parse(
            r#"{"username": "u", "base_url": "https://api.example/",
                "fixtures": [{"kind": "shift-template", "path": "data/t.csv"},
                             {"kind": "tank", "path": "x"}]}"#,
        );
        assert!(matches!(config, Err(ConfigError::Fixture { index: 1, .. })));

        let config = parse(
            r#"{"username": "u", "base_url": "https://api.example/",
                "fixtures": [{"kind": "shift-template", "path": "data/t.csv"}]}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://api.example");
        assert_eq!(
            config.resolved_fixtures().unwrap(),
            vec![Fixture {
                kind: EntityKind::ShiftTemplate,
                path: PathBuf::from("/seed/data/t.csv"),
            }]
        );
    }

    #[test]
    fn test_day_schedules_are_seedable() {
        let config = parse(r#"{"username": "u", "fixtures": [{"kind": "day-schedule", "path": "day_schedules.csv"}]}"#)
            .unwrap();
        assert_eq!(
            config.resolved_fixtures().unwrap(),
            vec![Fixture {
                kind: EntityKind::DaySchedule,
                path: PathBuf::from("/seed/day_schedules.csv"),
            }]
        );
    }

    #[test]
    fn test_rejects_embedded_kind() {
        let err = parse(r#"{"username": "u", "fixtures": [{"kind": "time_of_day", "path": "t.csv"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("cannot be submitted"));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            parse(r#"{"username": "u", "base_url": "localhost:3000"}"#),
            Err(ConfigError::BaseUrl(_))
        ));
        assert!(matches!(parse(r#"{"username": "  "}"#), Err(ConfigError::EmptyUsername)));
        assert!(matches!(
            parse(r#"{"username": "u", "timeout_secs": 0}"#),
            Err(ConfigError::ZeroTimeout)
        ));
        assert!(matches!(
            parse(r#"{"username": "u", "log_level": "loud"}"#),
            Err(ConfigError::LogLevel(_))
        ));
        assert!(matches!(parse(r#"{"password": "p"}"#), Err(ConfigError::Parse(_))));
    }
}
