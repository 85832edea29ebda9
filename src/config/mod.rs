//! Configuration module for the seat allocation backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// The single city this deployment serves; stamped onto new blocks
    pub city: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("SEATFLOW_API_PSK").ok();

        let db_path = env::var("SEATFLOW_DB_PATH")
            .unwrap_or_else(|_| "./data/seatflow.sqlite".to_string())
            .into();

        let bind_addr = env::var("SEATFLOW_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SEATFLOW_BIND_ADDR format");

        let log_level = env::var("SEATFLOW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let city = env::var("SEATFLOW_CITY").unwrap_or_else(|_| "Bengaluru".to_string());

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SEATFLOW_API_PSK");
        env::remove_var("SEATFLOW_DB_PATH");
        env::remove_var("SEATFLOW_BIND_ADDR");
        env::remove_var("SEATFLOW_LOG_LEVEL");
        env::remove_var("SEATFLOW_CITY");

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/seatflow.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.city, "Bengaluru");
    }
}
