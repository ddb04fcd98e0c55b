use std::collections::HashMap;

use crate::config::Config;
use crate::constants::{SOURCE_TWITTER, SOURCE_TWITTER_TOREAD};

/// Registry of destination databases, keyed by source name.
///
/// Filled once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct DatabaseRegistry {
    databases: HashMap<String, String>,
}

impl DatabaseRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            databases: HashMap::new(),
        }
    }

    /// Registry with the databases named in the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        if let Some(id) = &config.inbox_database_id {
            registry.register(SOURCE_TWITTER, id.clone());
        }
        if let Some(id) = &config.toread_database_id {
            registry.register(SOURCE_TWITTER_TOREAD, id.clone());
        }
        registry
    }

    /// Register a database, replacing any earlier entry for the source.
    pub fn register(&mut self, source_name: impl Into<String>, database_id: impl Into<String>) {
        self.databases.insert(source_name.into(), database_id.into());
    }

    /// Find the database for a source.
    #[must_use]
    pub fn lookup(&self, source_name: &str) -> Option<&str> {
        self.databases.get(source_name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}
