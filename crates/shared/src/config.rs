//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Files under `config/` are optional; `COMERCIO__`-prefixed environment
    /// variables override them (e.g. `COMERCIO__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COMERCIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_sizes() {
        assert_eq!(default_max_connections(), 10);
        assert_eq!(default_min_connections(), 1);
    }

    #[test]
    fn test_database_config_defaults_applied() {
        let cfg: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/comercio"}"#).unwrap();
        assert_eq!(cfg.url, "postgres://localhost/comercio");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.min_connections, 1);
    }
}
