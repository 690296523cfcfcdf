// Runtime configuration loaded from the environment
// Built once at startup and handed to the services that need it

use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Refresh tokens always live for seven days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ALGORITHM: &str = "HS256";
const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;
/// One year
const MAX_ACCESS_TOKEN_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Token signing settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Split out from `from_env` so tests do not have to mutate the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let secret = lookup("SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let algorithm = parse_algorithm(
            &lookup("ALGORITHM").unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
        )?;

        let access_token_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_number::<i64>("ACCESS_TOKEN_EXPIRE_MINUTES", &raw)?,
            None => DEFAULT_ACCESS_TOKEN_MINUTES,
        };
        if !(1..=MAX_ACCESS_TOKEN_MINUTES).contains(&access_token_minutes) {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("must be between 1 and {} minutes", MAX_ACCESS_TOKEN_MINUTES),
            });
        }

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse_number::<u32>("DATABASE_MAX_CONNECTIONS", &raw)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => parse_number::<u16>("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt: JwtConfig {
                secret,
                algorithm,
                access_token_minutes,
                refresh_token_days: REFRESH_TOKEN_TTL_DAYS,
            },
        })
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Only the shared-secret HMAC family makes sense with a single secret key
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim()).map_err(|_| ConfigError::Invalid {
        name: "ALGORITHM",
        reason: format!("unknown algorithm '{}'", raw),
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::Invalid {
            name: "ALGORITHM",
            reason: format!("{:?} needs a key pair, only HS256/HS384/HS512 are supported", other),
        }),
    }
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("'{}' is not a valid number", raw),
    })
}
