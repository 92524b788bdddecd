use crate::db::calendar::Zone;
use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use strum::{Display, EnumString};

/// Deployment mode. Controls log verbosity and whether error details reach clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,

    /// Zone that defines the calendar day for dedup, listing and export.
    pub zone: Zone,
    pub environment: Environment,

    // Rate limiting, 0 disables
    pub rate_register_per_min: u32,

    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // a named zone wins over a fixed offset; with neither, follow the host
        let zone = match (var("APP_TIMEZONE"), var("TZ_OFFSET")) {
            (Some(name), _) => Tz::from_str(name.trim())
                .map(Zone::Named)
                .map_err(|e| anyhow!("APP_TIMEZONE must be an IANA zone like America/Lima ({e})"))?,
            (None, Some(raw)) => FixedOffset::from_str(raw.trim())
                .map(Zone::Fixed)
                .map_err(|e| anyhow!("TZ_OFFSET must look like -05:00 ({e})"))?,
            (None, None) => Zone::Local,
        };

        let environment = match var("APP_ENV") {
            Some(raw) => Environment::from_str(raw.trim())
                .map_err(|_| anyhow!("APP_ENV must be development or production, got {raw}"))?,
            None => Environment::Development,
        };

        Ok(Self {
            server_addr: var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database_url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10)?,
            zone,
            environment,
            rate_register_per_min: parse_or(&var, "RATE_REGISTER_PER_MIN", 0)?,
            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn parse_or<F>(var: &F, key: &str, default: u32) -> Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw}")),
        None => Ok(default),
    }
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("TZ_OFFSET", "+00:00"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.rate_register_per_min, 0);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.zone, Zone::Fixed(FixedOffset::east_opt(0).unwrap()));
    }

    #[test]
    fn parses_offset_and_environment() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "mysql://u:p@localhost/asistencia"),
            ("TZ_OFFSET", "-05:00"),
            ("APP_ENV", "Production"),
            ("RATE_REGISTER_PER_MIN", "30"),
        ]))
        .unwrap();

        assert_eq!(config.zone, Zone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()));
        assert!(config.environment.is_production());
        assert_eq!(config.rate_register_per_min, 30);
    }

    #[test]
    fn named_zone_takes_precedence_over_offset() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP_TIMEZONE", "America/New_York"),
            ("TZ_OFFSET", "-05:00"),
        ]))
        .unwrap();

        assert_eq!(config.zone, Zone::Named(chrono_tz::America::New_York));
        assert_eq!(config.zone.to_string(), "America/New_York");
    }

    #[test]
    fn host_zone_is_followed_when_nothing_is_set() {
        let config = Config::from_vars(lookup(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.zone, Zone::Local);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Config::from_vars(lookup(&[])).is_err());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(
            Config::from_vars(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("TZ_OFFSET", "lima")]))
                .is_err()
        );
        assert!(
            Config::from_vars(lookup(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("DB_MAX_CONNECTIONS", "many"),
            ]))
            .is_err()
        );
        assert!(
            Config::from_vars(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("APP_ENV", "qa")]))
                .is_err()
        );
        assert!(
            Config::from_vars(lookup(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("APP_TIMEZONE", "Mars/Olympus"),
            ]))
            .is_err()
        );
    }
}
