//! Application settings loaded via OrthoConfig.
//!
//! Values merge CLI flags, `WHOAMI_*` environment variables, and config
//! files. Optional fields fall back to the defaults below through accessor
//! methods so the raw struct mirrors exactly what the operator supplied.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PUBLIC_BASE_URL: &str = "https://whoami.page";
const DEFAULT_FEED_CACHE_TTL_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr {
        /// Supplied value.
        value: String,
        /// Parser message.
        message: String,
    },
}

/// Process-wide configuration for the whoami backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WHOAMI")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies: `Strict`, `Lax`, or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Public origin used in the sitemap and robots.txt.
    pub public_base_url: Option<String>,
    /// Identity provider userinfo endpoint.
    pub identity_userinfo_url: Option<String>,
    /// Lifetime of cached feed pages; zero disables the cache.
    pub feed_cache_ttl_secs: Option<u64>,
    /// Apply embedded migrations on startup.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Maximum pooled connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Session key file path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies are `Secure`; defaults to `true`.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Public origin without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/')
    }

    /// Identity provider userinfo endpoint, if configured.
    pub fn identity_userinfo_url(&self) -> Option<&str> {
        self.identity_userinfo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Feed cache lifetime; `Duration::ZERO` disables caching.
    pub fn feed_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.feed_cache_ttl_secs
                .unwrap_or(DEFAULT_FEED_CACHE_TTL_SECS),
        )
    }

    /// Whether migrations run at startup; defaults to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
