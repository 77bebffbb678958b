//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Explicit database file path.  When unset the store picks the
    /// platform data directory.
    /// Env: `DB_PATH`
    pub db_path: Option<PathBuf>,

    /// Sender address on follower notification mail.
    /// Env: `MAIL_FROM`
    /// Default: `notifier@gazette.example`
    pub mail_from: String,

    /// Human-readable name for this instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Gazette"`
    pub instance_name: String,

    /// Hours added to every recorded logout timestamp.  Deployments that
    /// relied on the legacy timezone correction set this to `-3`.
    /// Env: `LOGOUT_CLOCK_OFFSET_HOURS`
    /// Default: `0`
    pub logout_clock_offset_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            db_path: None,
            mail_from: "notifier@gazette.example".to_string(),
            instance_name: "Gazette".to_string(),
            logout_clock_offset_hours: 0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(path) = std::env::var("DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(from) = std::env::var("MAIL_FROM") {
            if !from.is_empty() {
                config.mail_from = from;
            }
        }

        if let Ok(name) = std::env::var("INSTANCE_NAME") {
            config.instance_name = name;
        }

        if let Ok(val) = std::env::var("LOGOUT_CLOCK_OFFSET_HOURS") {
            if let Ok(hours) = val.parse::<i64>() {
                config.logout_clock_offset_hours = hours;
            } else {
                tracing::warn!(
                    value = %val,
                    "Invalid LOGOUT_CLOCK_OFFSET_HOURS, using default"
                );
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.logout_clock_offset_hours, 0);
        assert!(config.db_path.is_none());
    }
}
