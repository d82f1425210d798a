//! Configuration module for the placement backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::eligibility::BranchPolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared client API key (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Lifetime of a login session in hours
    pub session_ttl_hours: i64,
    /// PBKDF2 iteration count for new password hashes
    pub password_rounds: u32,
    /// Meaning of a company without eligible branches
    pub empty_branches: BranchPolicy,
}

/// A configuration variable holding a value that cannot be parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid {}={:?}: {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("PLACEMENT_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("PLACEMENT_DB_PATH")
            .unwrap_or_else(|_| "./data/placement.sqlite".to_string())
            .into();

        let index_path = env::var("PLACEMENT_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let log_level = env::var("PLACEMENT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            db_path,
            index_path,
            bind_addr: parse_var("PLACEMENT_BIND_ADDR", "127.0.0.1:8080")?,
            log_level,
            log_json: parse_var("PLACEMENT_LOG_JSON", "false")?,
            session_ttl_hours: parse_var("PLACEMENT_SESSION_TTL_HOURS", "24")?,
            password_rounds: parse_var("PLACEMENT_PASSWORD_ROUNDS", "100000")?,
            empty_branches: parse_var("PLACEMENT_EMPTY_BRANCHES", "unrestricted")?,
        })
    }
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 9] = [
        "PLACEMENT_API_PSK",
        "PLACEMENT_DB_PATH",
        "PLACEMENT_INDEX_PATH",
        "PLACEMENT_BIND_ADDR",
        "PLACEMENT_LOG_LEVEL",
        "PLACEMENT_LOG_JSON",
        "PLACEMENT_SESSION_TTL_HOURS",
        "PLACEMENT_PASSWORD_ROUNDS",
        "PLACEMENT_EMPTY_BRANCHES",
    ];

    // Both checks mutate the process environment, so they run in one test.
    #[test]
    fn test_config_from_env() {
        for key in KEYS {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/placement.sqlite"));
        assert_eq!(config.index_path, PathBuf::from("./data/index"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.password_rounds, 100_000);
        assert_eq!(config.empty_branches, BranchPolicy::Unrestricted);

        env::set_var("PLACEMENT_SESSION_TTL_HOURS", "a day");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.key, "PLACEMENT_SESSION_TTL_HOURS");
        assert_eq!(err.value, "a day");
        env::remove_var("PLACEMENT_SESSION_TTL_HOURS");
    }
}
