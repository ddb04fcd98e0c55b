use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_NOTION_API_BASE, DEFAULT_NOTION_VERSION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Notion API
    pub notion_token: String,
    pub notion_api_base: String,
    pub notion_version: String,
    pub http_timeout: Duration,

    // Target databases
    pub inbox_database_id: Option<String>,
    pub toread_database_id: Option<String>,

    // Local data
    pub work_dir: PathBuf,
    pub data_folder: PathBuf,
    pub run_id: String,

    // Run plan
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Notion API
            notion_token: required_env("NOTION_TOKEN")?,
            notion_api_base: env_or_default("NOTION_API_BASE", DEFAULT_NOTION_API_BASE),
            notion_version: env_or_default("NOTION_VERSION", DEFAULT_NOTION_VERSION),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Target databases
            inbox_database_id: optional_env("NOTION_DATABASE_ID_TWITTER_INBOX"),
            toread_database_id: optional_env("NOTION_DATABASE_ID_TOREAD"),

            // Local data
            work_dir: PathBuf::from(env_or_default("WORKDIR", ".")),
            data_folder: PathBuf::from(env_or_default("DATA_FOLDER", "./data")),
            run_id: optional_env("RUN_ID").unwrap_or_default(),

            // Run plan
            sources: parse_list(&env_or_default("SOURCES", "twitter")),
            targets: parse_list(&env_or_default("TARGETS", "notion")),
        })
    }

    /// Defaults suitable for tests: a dummy token and the public API base.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            notion_token: "secret_test".to_string(),
            notion_api_base: DEFAULT_NOTION_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            http_timeout: Duration::from_secs(10),
            inbox_database_id: None,
            toread_database_id: None,
            work_dir: PathBuf::from("."),
            data_folder: PathBuf::from("./data"),
            run_id: String::new(),
            sources: vec!["twitter".to_string()],
            targets: vec!["notion".to_string()],
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notion_token.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "NOTION_TOKEN".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.notion_api_base) {
            return Err(ConfigError::InvalidValue {
                name: "NOTION_API_BASE".to_string(),
                message: e.to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.sources.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "SOURCES".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "TARGETS".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Directory holding the data files of this run.
    #[must_use]
    pub fn run_data_dir(&self) -> PathBuf {
        self.work_dir.join(&self.data_folder).join(&self.run_id)
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

/// Split a comma separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
