//! Configuration module for the Proco backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/proco.sqlite?mode=rwc";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the listener binds to
    pub host: IpAddr,
    /// First port tried by the listener
    pub port: u16,
    /// How many consecutive ports are tried before giving up
    pub port_attempts: u16,
    /// Location of the primary document store
    pub database_url: String,
    /// Connect-time budget for the primary store
    pub connect_timeout: Duration,
    /// Single allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
    /// Per-connection buffer of pending notification events
    pub subscriber_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            port_attempts: 10,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            cors_origin: None,
            log_level: "info".to_string(),
            log_json: false,
            subscriber_buffer: 64,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("MONGODB_URI"))
            .unwrap_or(defaults.database_url);

        let cors_origin = env::var("PROCO_CORS_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        let log_level = env::var("PROCO_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_json = env::var("PROCO_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            host: parse_var("PROCO_HOST", defaults.host),
            port: parse_var("PORT", defaults.port),
            port_attempts: parse_var("PROCO_PORT_ATTEMPTS", defaults.port_attempts).max(1),
            database_url,
            connect_timeout: Duration::from_secs(parse_var(
                "PROCO_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            cors_origin,
            log_level,
            log_json,
            subscriber_buffer: parse_var("PROCO_SUBSCRIBER_BUFFER", defaults.subscriber_buffer)
                .max(1),
        }
    }
}

/// Read and parse a variable, keeping the default when it is unset or malformed.
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            // Logging is not initialised yet when config loads.
            eprintln!("Ignoring invalid {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
