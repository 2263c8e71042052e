// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! loader used at startup. Configuration is read once in `main` and passed
//! down; nothing else in the crate touches the process environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8001` |
//! | `JWT_SECRET` | HMAC key for signing and verifying tokens | Required |
//! | `JWT_EXPIRATION_HOURS` | Access token lifetime (1–87600) | `24` |
//! | `JWT_REFRESH_EXPIRATION_HOURS` | Refresh token lifetime (1–87600) | `168` |
//! | `BCRYPT_COST` | bcrypt work factor (4–31) | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, str::FromStr};

use chrono::{Duration, Utc};

use crate::auth::{
    password::{BCRYPT_COST_RANGE, DEFAULT_BCRYPT_COST},
    token::{ACCESS_TOKEN_TTL_HOURS, REFRESH_TOKEN_TTL_HOURS},
};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the token signing secret.
///
/// There is no fallback value: a server without a secret refuses to start.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const JWT_EXPIRATION_HOURS_ENV: &str = "JWT_EXPIRATION_HOURS";
pub const JWT_REFRESH_EXPIRATION_HOURS_ENV: &str = "JWT_REFRESH_EXPIRATION_HOURS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Longest accepted token lifetime, ten years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 10 * 365 * 24;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8001;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

// Keep the secret out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let access_token_ttl = token_lifetime(
            JWT_EXPIRATION_HOURS_ENV,
            parse_or(&lookup, JWT_EXPIRATION_HOURS_ENV, ACCESS_TOKEN_TTL_HOURS)?,
        )?;
        let refresh_token_ttl = token_lifetime(
            JWT_REFRESH_EXPIRATION_HOURS_ENV,
            parse_or(&lookup, JWT_REFRESH_EXPIRATION_HOURS_ENV, REFRESH_TOKEN_TTL_HOURS)?,
        )?;

        let bcrypt_cost = parse_or(&lookup, BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: BCRYPT_COST_ENV,
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            server: ServerConfig {
                host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?,
            },
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl,
                refresh_token_ttl,
                bcrypt_cost,
            },
            log: LogConfig {
                format: parse_or(&lookup, LOG_FORMAT_ENV, LogFormat::default())?,
            },
        })
    }
}

/// Accept `1..=MAX_TOKEN_TTL_HOURS` hours whose expiry is representable
/// from now.
fn token_lifetime(name: &'static str, hours: i64) -> Result<Duration, ConfigError> {
    (1..=MAX_TOKEN_TTL_HOURS)
        .contains(&hours)
        .then(|| Duration::try_hours(hours))
        .flatten()
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| ConfigError::Invalid {
            name,
            value: hours.to_string(),
        })
}

/// Parse `name` when set, fall back to `default` when unset.
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8001");
        assert_eq!(config.auth.access_token_ttl, Duration::hours(24));
        assert_eq!(config.auth.refresh_token_ttl, Duration::hours(168));
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV)));
        assert_eq!(
            load(&[(JWT_SECRET_ENV, "  ")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (JWT_EXPIRATION_HOURS_ENV, "1"),
            (JWT_REFRESH_EXPIRATION_HOURS_ENV, "48"),
            (BCRYPT_COST_ENV, "12"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.auth.access_token_ttl, Duration::hours(1));
        assert_eq!(config.auth.refresh_token_ttl, Duration::hours(48));
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_fail_loudly() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "http")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: PORT_ENV,
                value: "http".to_string()
            }
        );

        assert!(load(&[(JWT_SECRET_ENV, "s"), (BCRYPT_COST_ENV, "3")]).is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (BCRYPT_COST_ENV, "32")]).is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (JWT_EXPIRATION_HOURS_ENV, "0")]).is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (LOG_FORMAT_ENV, "xml")]).is_err());
    }

    #[test]
    fn token_lifetimes_are_capped() {
        assert_eq!(
            load(&[(JWT_SECRET_ENV, "s"), (JWT_EXPIRATION_HOURS_ENV, "10000000000")]),
            Err(ConfigError::Invalid {
                name: JWT_EXPIRATION_HOURS_ENV,
                value: "10000000000".to_string()
            })
        );
        assert!(load(&[
            (JWT_SECRET_ENV, "s"),
            (JWT_REFRESH_EXPIRATION_HOURS_ENV, i64::MAX.to_string().as_str())
        ])
        .is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (JWT_EXPIRATION_HOURS_ENV, "-5")]).is_err());

        let longest = MAX_TOKEN_TTL_HOURS.to_string();
        let config =
            load(&[(JWT_SECRET_ENV, "s"), (JWT_EXPIRATION_HOURS_ENV, longest.as_str())]).unwrap();
        assert_eq!(config.auth.access_token_ttl, Duration::hours(MAX_TOKEN_TTL_HOURS));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = load(&[(JWT_SECRET_ENV, "do-not-print")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("do-not-print"));
        assert!(rendered.contains("<redacted>"));
    }
}
