//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, listen address, token signing key and password hashing
//! cost. The resulting [`Config`] is built once at startup and never mutated.

use std::env;

use thiserror::Error;

/// The only signing algorithm the token service accepts.
pub const SUPPORTED_JWT_ALGORITHM: &str = "HS256";

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES))
    }
}

// Keep the secret out of debug output and logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt: JwtConfig,
    pub hash_cost: HashCost,
}

impl Config {
    /// Loads configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must not be empty".to_string(),
            });
        }

        let algorithm = lookup("JWT_ALGORITHM")
            .map(|a| a.trim().to_ascii_uppercase())
            .unwrap_or_else(|| SUPPORTED_JWT_ALGORITHM.to_string());
        if algorithm != SUPPORTED_JWT_ALGORITHM {
            return Err(ConfigError::Invalid {
                name: "JWT_ALGORITHM",
                reason: format!("unsupported algorithm {algorithm}, expected {SUPPORTED_JWT_ALGORITHM}"),
            });
        }

        let ttl_minutes = parse_positive(
            &lookup,
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            DEFAULT_TOKEN_TTL_MINUTES,
        )?;
        if ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("must be at most {MAX_TOKEN_TTL_MINUTES}"),
            });
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_positive(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_positive(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_positive(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            jwt: JwtConfig {
                secret,
                algorithm,
                ttl_minutes,
            },
            hash_cost,
        })
    }
}

fn parse_positive<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    let value = raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("{raw:?} is not a number"),
    })?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.jwt.ttl_minutes, 30);
        assert_eq!(config.hash_cost, HashCost::default());
    }

    #[test]
    fn missing_or_blank_secret_is_rejected() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "   ")])),
            Err(ConfigError::Invalid { name: "JWT_SECRET", .. })
        ));
    }

    #[test]
    fn ttl_must_be_positive() {
        for bad in ["0", "-5", "soon"] {
            let result = Config::from_lookup(lookup(&[
                ("JWT_SECRET", "k"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", bad),
            ]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn ttl_has_an_upper_bound() {
        let too_long = (MAX_TOKEN_TTL_MINUTES + 1).to_string();
        let huge = i64::MAX.to_string();
        for bad in [too_long.as_str(), huge.as_str()] {
            let result = Config::from_lookup(lookup(&[
                ("JWT_SECRET", "k"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", bad),
            ]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })),
                "{bad} should be rejected"
            );
        }

        let longest = MAX_TOKEN_TTL_MINUTES.to_string();
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "k"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", longest.as_str()),
        ]))
        .unwrap();
        let tokens = crate::auth::token::TokenService::new(&config.jwt);
        assert_eq!(tokens.default_ttl(), chrono::Duration::days(365));
    }

    #[test]
    fn ttl_never_panics_on_hand_built_config() {
        let jwt = JwtConfig {
            secret: "k".into(),
            algorithm: SUPPORTED_JWT_ALGORITHM.into(),
            ttl_minutes: i64::MAX,
        };
        assert_eq!(jwt.ttl(), chrono::Duration::minutes(MAX_TOKEN_TTL_MINUTES));
    }

    #[test]
    fn only_hs256_is_accepted() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "k"), ("JWT_ALGORITHM", "hs256")]))
            .unwrap();
        assert_eq!(config.jwt.algorithm, "HS256");

        let result = Config::from_lookup(lookup(&[("JWT_SECRET", "k"), ("JWT_ALGORITHM", "RS256")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "JWT_ALGORITHM", .. })));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "k"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDRESS", "0.0.0.0:8080"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "15"),
            ("PASSWORD_HASH_MEMORY_KIB", "8192"),
            ("PASSWORD_HASH_ITERATIONS", "3"),
            ("PASSWORD_HASH_PARALLELISM", "2"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.jwt.ttl(), chrono::Duration::minutes(15));
        assert_eq!(
            config.hash_cost,
            HashCost { memory_kib: 8192, iterations: 3, parallelism: 2 }
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "do-not-print")])).unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
