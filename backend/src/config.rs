use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Runtime settings, read from `CARGO_MOVEMENT_*` environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Base URL of the cargo service; the cargo id is appended as a path segment
    #[serde(default = "default_cargo_service_url")]
    pub cargo_service_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allowed CORS origin. Any origin is allowed when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_database_url() -> String {
    "sqlite:cargo_movements.db".to_string()
}

fn default_cargo_service_url() -> String {
    "http://delivery-service-spring-service:8080/api/cargos".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("CARGO_MOVEMENT"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-wide, so these tests must not overlap
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "CARGO_MOVEMENT_PORT",
        "CARGO_MOVEMENT_DATABASE_URL",
        "CARGO_MOVEMENT_CARGO_SERVICE_URL",
        "CARGO_MOVEMENT_CORS_ORIGIN",
    ];

    fn clear_vars() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_vars();

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url, "sqlite:cargo_movements.db");
        assert_eq!(
            config.cargo_service_url,
            "http://delivery-service-spring-service:8080/api/cargos"
        );
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_vars();

        std::env::set_var("CARGO_MOVEMENT_PORT", "9090");
        std::env::set_var("CARGO_MOVEMENT_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("CARGO_MOVEMENT_CARGO_SERVICE_URL", "http://localhost:8080/api/cargos");
        std::env::set_var("CARGO_MOVEMENT_CORS_ORIGIN", "http://localhost:3000");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.cargo_service_url, "http://localhost:8080/api/cargos");
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));

        clear_vars();
    }
}
