// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;
use thiserror::Error;

/// Minimum score (inclusive) counted as a pass.
pub const PASSING_SCORE: i64 = 70;

/// Number of attempts shown in the "recent attempts" analytics view.
pub const RECENT_ATTEMPTS_LIMIT: usize = 5;

/// Default quiz time limit in minutes.
pub const DEFAULT_TIME_LIMIT: i32 = 45;

/// Inclusive upper bounds of the first four histogram buckets; the fifth takes the rest.
pub const SCORE_BUCKET_EDGES: [i64; 4] = [20, 40, 60, 80];

/// Upper bound on any client-reported duration, in seconds (one day).
pub const MAX_REPORTED_SECONDS: f64 = 86_400.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub seed_sample_quizzes: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("BIND_ADDR", raw))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let seed_sample_quizzes = env::var("SEED_SAMPLE_QUIZZES")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            seed_sample_quizzes,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, parse_flag};

    #[test]
    fn config_errors_name_the_variable() {
        assert_eq!(ConfigError::Missing("JWT_SECRET").to_string(), "JWT_SECRET must be set");
        assert_eq!(
            ConfigError::Invalid("BIND_ADDR", "nowhere".into()).to_string(),
            "BIND_ADDR has an invalid value: nowhere"
        );
    }

    #[test]
    fn flags_accept_common_truthy_spellings() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v}");
        }
        for v in ["0", "false", "", "nope"] {
            assert!(!parse_flag(v), "{v}");
        }
    }
}
