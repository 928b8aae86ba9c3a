//! Process configuration read from the environment (and `.env`, if present).

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub currency: String,
    pub log_filter: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
    #[error("STORE_CURRENCY must be a three-letter code, got '{0}'")]
    InvalidCurrency(String),
}

impl Default for Config {
    fn default() -> Self {
        Self { port: 8083, currency: "EGP".to_string(), log_filter: "info".to_string() }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };
        let currency = match lookup("STORE_CURRENCY") {
            Some(raw) => {
                let code = raw.trim().to_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidCurrency(raw));
                }
                code
            }
            None => defaults.currency,
        };
        let log_filter = lookup("RUST_LOG").unwrap_or(defaults.log_filter);
        Ok(Self { port, currency, log_filter })
    }
}
