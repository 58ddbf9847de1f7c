//! Environment-backed configuration for the storefront services.
//!
//! All settings are read once at startup via [`AppConfig::from_env`]; the
//! process refuses to start without the database URL and the token-signing
//! secret. The secret is held as plain process state afterwards and is never
//! logged.

use std::env;

use thiserror::Error;

/// Default bcrypt work factor. Matches `bcrypt::DEFAULT_COST` without pulling
/// the bcrypt crate into the config layer.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default lifetime of issued access tokens, in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),
    #[error("Environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: optional_parsed("PORT", 8000)?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: optional_parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_secs: optional_parsed("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            bcrypt_cost: optional_parsed("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
        })
    }
}

// The secret must stay out of logs and panics.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional_parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::Invalid(name))
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_vars_fail_startup() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("JWT_SECRET");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        std::env::remove_var("PORT");
        std::env::remove_var("TOKEN_TTL_SECS");
        assert_eq!(optional_parsed("PORT", 8000u16).unwrap(), 8000);
        assert_eq!(
            optional_parsed("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS).unwrap(),
            DEFAULT_TOKEN_TTL_SECS
        );
    }
}
