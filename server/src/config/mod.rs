use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::clock::VenueTime;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
/// India Standard Time, UTC+05:30.
const DEFAULT_VENUE_OFFSET_MINUTES: i32 = 330;
const DEFAULT_ADMIN_EMAIL: &str = "admin@darshan.local";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means tokens and accounts live in memory only.
    pub database_url: Option<String>,
    pub port: u16,
    pub production: bool,
    pub venue: VenueTime,
    pub admin_email: String,
    pub temple_data_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a TCP port number",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let offset_minutes = match non_empty("VENUE_UTC_OFFSET_MINUTES") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "VENUE_UTC_OFFSET_MINUTES",
                expected: "an integer number of minutes",
                value: raw.clone(),
            })?,
            None => DEFAULT_VENUE_OFFSET_MINUTES,
        };
        let venue =
            VenueTime::from_offset_minutes(offset_minutes).ok_or_else(|| ConfigError::Invalid {
                name: "VENUE_UTC_OFFSET_MINUTES",
                expected: "strictly between -1440 and 1440",
                value: offset_minutes.to_string(),
            })?;

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            port,
            production: non_empty("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            venue,
            admin_email: non_empty("ADMIN_EMAIL")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            temple_data_path: non_empty("TEMPLE_DATA_PATH").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_url.is_none());
        assert!(!config.production);
        assert_eq!(config.venue.offset().local_minus_utc(), 330 * 60);
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/darshan"),
            ("RUST_ENV", "Production"),
            ("VENUE_UTC_OFFSET_MINUTES", "-300"),
            ("ADMIN_EMAIL", " Priest@Temple.org "),
        ])
        .unwrap();
        assert_eq!(config.bind_addr().port(), 8080);
        assert!(config.production);
        assert_eq!(config.venue.offset().local_minus_utc(), -300 * 60);
        assert_eq!(config.admin_email, "priest@temple.org");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("VENUE_UTC_OFFSET_MINUTES", "1440")]).is_err());
        assert!(config_from(&[("VENUE_UTC_OFFSET_MINUTES", "ist")]).is_err());
    }
}
