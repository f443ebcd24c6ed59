//! Session cookie configuration and validation.
//!
//! Turns the session toggles from [`crate::settings::AppSettings`] into a
//! signing key and cookie policy. Release builds reject weak or ephemeral
//! keys; debug builds fall back to a generated key with a warning.

pub mod fingerprint;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and emit warnings.
    Debug,
    /// Release builds require a strong, persistent key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use whoami::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles prior to validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToggles {
    /// Key material location.
    pub key_file: PathBuf,
    /// Mark cookies `Secure`.
    pub cookie_secure: bool,
    /// Requested `SameSite` policy; `Lax` when absent.
    pub same_site: Option<String>,
    /// Permit a generated key when the file is unreadable.
    pub allow_ephemeral: bool,
}

impl From<&AppSettings> for SessionToggles {
    fn from(settings: &AppSettings) -> Self {
        Self {
            key_file: settings.session_key_file(),
            cookie_secure: settings.session_cookie_secure(),
            same_site: settings.session_same_site.clone(),
            allow_ephemeral: settings.session_allow_ephemeral,
        }
    }
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// The `SameSite` value is not recognised.
    #[error("invalid session SameSite '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("session SameSite=None requires secure cookies")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Validate toggles and derive the session key.
///
/// # Errors
///
/// Release builds fail on unreadable or short keys, ephemeral keys,
/// unknown `SameSite` values, and `SameSite=None` without `Secure`.
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let same_site = same_site(toggles, mode)?;
    let key = session_key(toggles, mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site,
    })
}

fn same_site(toggles: &SessionToggles, mode: BuildMode) -> Result<SameSite, SessionConfigError> {
    let Some(value) = toggles.same_site.as_deref() else {
        return Ok(SameSite::Lax);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !toggles.cookie_secure {
                if !mode.is_debug() {
                    return Err(SessionConfigError::InsecureSameSiteNone);
                }
                warn!("session SameSite=None without Secure; browsers may reject the cookie");
            }
            Ok(SameSite::None)
        }
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid session SameSite, using Lax");
            Ok(SameSite::Lax)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(toggles: &SessionToggles, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let path = toggles.key_file.clone();
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || toggles.allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "session_config/tests.rs"]
mod tests;
