//! Runtime configuration loaded from the environment.
//!
//! `.env` is read first (if present), then:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | required unless `--database-url` is given |
//! | `DATABASE_MAX_CONNECTIONS` | 10 |
//! | `DATABASE_CONNECT_TIMEOUT_SECS` | 30 |
//! | `LOG_FORMAT` | `text` (`json` also accepted) |
//! | `LOG_FILE` | unset (console only) |
//! | `LOG_ANSI` | auto |

use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use jobboard_core::{defaults, Error, Result};
use jobboard_db::PoolConfig;

/// Environment variables read by [`Settings::from_env`].
const SETTINGS_VARS: &[&str] = &[
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "DATABASE_CONNECT_TIMEOUT_SECS",
    "LOG_FORMAT",
    "LOG_FILE",
    "LOG_ANSI",
];

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings for the migration binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub log_format: LogFormat,
    pub log_file: Option<String>,
    pub log_ansi: Option<bool>,
}

impl Settings {
    /// Load `.env` and read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Read the known settings variables through `lookup`.
    ///
    /// Only the keys in `SETTINGS_VARS` are queried. A value that is not
    /// valid UTF-8 is a configuration error.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let mut vars = HashMap::new();
        for &key in SETTINGS_VARS {
            match lookup(key) {
                Ok(value) => {
                    vars.insert(key.to_string(), value);
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(_)) => {
                    return Err(Error::Config(format!("{} is not valid UTF-8", key)))
                }
            }
        }
        Self::from_vars(vars)
    }

    /// Read settings from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                Error::Config(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{}'",
                    v
                ))
            })?,
            None => defaults::DB_MAX_CONNECTIONS,
        };

        let connect_timeout_secs = match get("DATABASE_CONNECT_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "DATABASE_CONNECT_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    v
                ))
            })?,
            None => defaults::DB_CONNECT_TIMEOUT_SECS,
        };

        let log_format = match get("LOG_FORMAT").unwrap_or(defaults::LOG_FORMAT) {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(Error::Config(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            database_url: get("DATABASE_URL").map(str::to_string),
            max_connections,
            connect_timeout_secs,
            log_format,
            log_file: get("LOG_FILE").map(str::to_string),
            log_ansi: get("LOG_ANSI").map(|v| v == "true" || v == "1"),
        })
    }

    /// Database URL, preferring an explicit override.
    pub fn database_url(&self, override_url: Option<&str>) -> Result<String> {
        override_url
            .map(str::to_string)
            .or_else(|| self.database_url.clone())
            .ok_or_else(|| {
                Error::Config("DATABASE_URL is not set and --database-url was not given".into())
            })
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}
