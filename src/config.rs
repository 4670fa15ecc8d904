use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub host_passcode: String,
    pub host_token_secret: String,
    pub host_token_ttl: Duration,
    pub board_cache_ttl: Duration,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => 8080,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(raw) => parse_bool("RUN_MIGRATIONS", &raw)?,
            None => true,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port,
            host_passcode: required("HOST_PASSCODE")?,
            host_token_secret: required("HOST_TOKEN_SECRET")?,
            host_token_ttl: parse_duration_secs(
                "HOST_TOKEN_TTL_SECS",
                lookup("HOST_TOKEN_TTL_SECS"),
                7 * 24 * 60 * 60,
            )?,
            board_cache_ttl: parse_duration_secs(
                "BOARD_CACHE_TTL_SECS",
                lookup("BOARD_CACHE_TTL_SECS"),
                2,
            )?,
            run_migrations,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_duration_secs(
    name: &'static str,
    raw: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(Duration::from_secs(default_secs)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/openmic"),
        ("HOST_PASSCODE", "letmein"),
        ("HOST_TOKEN_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.board_cache_ttl, Duration::from_secs(2));
        assert!(config.run_migrations);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_required_var_is_named() {
        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert_eq!(err.to_string(), "HOST_TOKEN_SECRET must be set");
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("BOARD_CACHE_TTL_SECS", "soon"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::Invalid { name: "BOARD_CACHE_TTL_SECS", .. })
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("RUN_MIGRATIONS", "off"));
        assert!(!AppConfig::from_lookup(lookup_from(&vars)).unwrap().run_migrations);
    }
}
