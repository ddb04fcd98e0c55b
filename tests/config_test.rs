//! Configuration loading from the process environment.

use std::time::Duration;

use notion_post_sync::config::{Config, ConfigError};
use notion_post_sync::registry::DatabaseRegistry;
use serial_test::serial;

const VARS: &[&str] = &[
    "NOTION_TOKEN",
    "NOTION_API_BASE",
    "NOTION_VERSION",
    "NOTION_DATABASE_ID_TWITTER_INBOX",
    "NOTION_DATABASE_ID_TOREAD",
    "HTTP_TIMEOUT_SECS",
    "WORKDIR",
    "DATA_FOLDER",
    "RUN_ID",
    "SOURCES",
    "TARGETS",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_token() {
    clear_env();
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "NOTION_TOKEN"));
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();
    std::env::set_var("NOTION_TOKEN", "secret_abc");

    let config = Config::from_env().unwrap();
    config.validate().unwrap();

    assert_eq!(config.notion_api_base, "https://api.notion.com/v1");
    assert_eq!(config.notion_version, "2022-06-28");
    assert_eq!(config.http_timeout, Duration::from_secs(30));
    assert_eq!(config.sources, vec!["twitter"]);
    assert_eq!(config.targets, vec!["notion"]);
    assert!(DatabaseRegistry::from_config(&config).is_empty());
    clear_env();
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    std::env::set_var("NOTION_TOKEN", "secret_abc");
    std::env::set_var("NOTION_DATABASE_ID_TWITTER_INBOX", "inbox-db");
    std::env::set_var("NOTION_DATABASE_ID_TOREAD", "toread-db");
    std::env::set_var("HTTP_TIMEOUT_SECS", "5");
    std::env::set_var("SOURCES", "twitter,rss");
    std::env::set_var("RUN_ID", "run-3");

    let config = Config::from_env().unwrap();
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.sources, vec!["twitter", "rss"]);
    assert_eq!(config.run_id, "run-3");

    let registry = DatabaseRegistry::from_config(&config);
    assert_eq!(registry.lookup("twitter"), Some("inbox-db"));
    assert_eq!(registry.lookup("twitter_toread"), Some("toread-db"));
    clear_env();
}

#[test]
#[serial]
fn test_bad_timeout() {
    clear_env();
    std::env::set_var("NOTION_TOKEN", "secret_abc");
    std::env::set_var("HTTP_TIMEOUT_SECS", "soon");

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::ParseInt { ref name, .. } if name == "HTTP_TIMEOUT_SECS"));
    clear_env();
}
