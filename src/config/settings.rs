//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_BANNER_PATH, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub banner_path: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("banner_path", &self.banner_path)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("PIKA_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| {
                tracing::warn!("No PIKA_DATABASE_URL environment variable detected, using default");
                DEFAULT_DATABASE_URL.to_string()
            });

        let max_connections = env::var("PIKA_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            database_url,
            max_connections,
            min_connections: env::var("PIKA_DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MIN_CONNECTIONS)
                .min(max_connections),
            banner_path: env::var("PIKA_BANNER")
                .unwrap_or_else(|_| DEFAULT_BANNER_PATH.to_string()),
        }
    }

    /// Configuration pointing at the given database with default pool settings.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            banner_path: DEFAULT_BANNER_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_database_url() {
        let config = Config::with_database_url("postgres://admin:secret@db/pika");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
