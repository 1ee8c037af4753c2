use crate::solver::{Strategy, UnknownStrategy};
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const ENV_BIND: &str = "SANTA_BIND";
pub const ENV_STRATEGY: &str = "SANTA_STRATEGY";
pub const ENV_MAX_ATTEMPTS: &str = "SANTA_MAX_ATTEMPTS";
pub const ENV_SEED: &str = "SANTA_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub strategy: Strategy,
    /// Greedy runs attempted per request before a dead end is reported.
    pub max_attempts: u32,
    /// Used when a request does not carry its own seed.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            strategy: Strategy::Greedy,
            max_attempts: 1,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_BIND) {
            config.bind_addr = value.trim().parse().map_err(|e: std::net::AddrParseError| {
                invalid(ENV_BIND, &value, e.to_string())
            })?;
        }
        if let Some(value) = get(ENV_STRATEGY) {
            config.strategy = value
                .parse()
                .map_err(|e: UnknownStrategy| invalid(ENV_STRATEGY, &value, e.to_string()))?;
        }
        if let Some(value) = get(ENV_MAX_ATTEMPTS) {
            config.max_attempts = match value.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(invalid(ENV_MAX_ATTEMPTS, &value, "must be at least 1".into()));
                }
                Ok(n) => n,
                Err(e) => return Err(invalid(ENV_MAX_ATTEMPTS, &value, e.to_string())),
            };
        }
        if let Some(value) = get(ENV_SEED) {
            config.seed = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| invalid(ENV_SEED, &value, e.to_string()))?,
            );
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}
