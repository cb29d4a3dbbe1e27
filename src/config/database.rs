//! Storage configuration.
//!
//! An empty `url` selects the in-memory stores. That is a development
//! convenience; production refuses to start without PostgreSQL.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL, or empty for in-memory storage.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply the embedded migrations before serving.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Whether PostgreSQL should back the stores.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Checks the URL and pool bounds. Without a URL only production fails.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !self.is_configured() {
            return if production {
                Err(ValidationError::MissingRequired("DATABASE_URL"))
            } else {
                Ok(())
            };
        }
        let url = self.url.trim();
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: default_run_migrations(),
        }
    }
}

// A 250-license catalogue needs only a small pool.
fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_run_migrations() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_url_means_in_memory_outside_production() {
        let config = DatabaseConfig::default();
        assert!(!config.is_configured());
        assert!(config.validate(false).is_ok());
        assert_eq!(
            config.validate(true),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        );
    }

    #[test]
    fn blank_url_is_not_a_database() {
        assert!(!postgres("   ").is_configured());
    }

    #[test]
    fn postgres_urls_are_accepted() {
        for url in ["postgres://kardiverse@db/kardiverse", "postgresql://localhost/test"] {
            let config = postgres(url);
            assert!(config.is_configured());
            assert!(config.validate(true).is_ok(), "{}", url);
        }
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(
            postgres("mysql://localhost/test").validate(false),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn pool_bounds_must_be_ordered_and_non_zero() {
        let inverted = DatabaseConfig {
            min_connections: 4,
            max_connections: 2,
            ..postgres("postgres://localhost/test")
        };
        let empty = DatabaseConfig {
            min_connections: 0,
            max_connections: 0,
            ..postgres("postgres://localhost/test")
        };
        assert_eq!(inverted.validate(false), Err(ValidationError::InvalidPoolSize));
        assert_eq!(empty.validate(false), Err(ValidationError::InvalidPoolSize));
    }

    #[test]
    fn defaults_run_migrations_on_a_small_pool() {
        let config = DatabaseConfig::default();
        assert!(config.run_migrations);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
    }
}
