//! User identity and profile primitives.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by the user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was shorter than the minimum.
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The username exceeded the maximum.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The username contained characters outside `[A-Za-z0-9_]`.
    #[error("username may only contain letters, numbers, or underscores")]
    UsernameInvalidCharacters,
    /// The full name was blank.
    #[error("full name must not be empty")]
    EmptyFullName,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Minimum username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length accepted by profile edits.
pub const USERNAME_MAX: usize = 30;
/// Maximum username length accepted while onboarding.
pub const ONBOARDING_USERNAME_MAX: usize = 20;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9_]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Public handle used in profile URLs, always stored lowercase.
///
/// # Examples
/// ```
/// use whoami::domain::Username;
///
/// let name = Username::new("Ada_Lovelace").expect("valid username");
/// assert_eq!(name.as_ref(), "ada_lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username against the profile-edit limits.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::with_max(raw, USERNAME_MAX)
    }

    /// Validate a username against the stricter onboarding limits.
    pub fn for_onboarding(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::with_max(raw, ONBOARDING_USERNAME_MAX)
    }

    fn with_max(raw: impl Into<String>, max: usize) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > max {
            return Err(UserValidationError::UsernameTooLong { max });
        }
        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name shown alongside the username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and trim a full name.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity asserted by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    /// Provider subject, unique per account.
    pub subject: String,
    /// Primary email address.
    pub email: String,
    /// Given name, when the provider shares it.
    pub first_name: Option<String>,
    /// Family name, when the provider shares it.
    pub last_name: Option<String>,
    /// Avatar URL hosted by the provider.
    pub image_url: Option<String>,
}

/// Application user.
///
/// ## Invariants
/// - `username` is unique case-insensitively and stored lowercase.
/// - `external_subject` and `email` are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Internal identifier.
    pub id: UserId,
    /// Identity provider subject.
    pub external_subject: String,
    /// Account email.
    pub email: String,
    /// Public handle.
    pub username: Username,
    /// Display name; absent until onboarding collects it.
    pub full_name: Option<String>,
    /// Given name copied from the identity provider.
    pub first_name: Option<String>,
    /// Family name copied from the identity provider.
    pub last_name: Option<String>,
    /// Headline shown under the name.
    pub job_title: Option<String>,
    /// Personal website.
    pub website: Option<String>,
    /// Free-form location.
    pub location: Option<String>,
    /// Profile biography.
    pub description: Option<String>,
    /// Avatar URL.
    pub profile_image: Option<String>,
    /// Verified badge.
    pub verified: bool,
    /// Whether the onboarding flow has finished.
    pub onboarding_complete: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Compact projection used inside posts and follow lists.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.as_ref().to_owned(),
            full_name: self.full_name.clone(),
            profile_image: self.profile_image.clone(),
            verified: self.verified,
            is_following: false,
        }
    }
}

/// Compact author card.
///
/// `is_following` is relative to the current viewer and is `false` for
/// anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Internal identifier.
    pub id: UserId,
    /// Public handle.
    pub username: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Avatar URL.
    pub profile_image: Option<String>,
    /// Verified badge.
    pub verified: bool,
    /// Whether the viewer follows this user.
    pub is_following: bool,
}

/// Fields required to insert a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identity provider subject.
    pub external_subject: String,
    /// Account email.
    pub email: String,
    /// Chosen handle.
    pub username: Username,
    /// Display name.
    pub full_name: FullName,
    /// Given name from the identity.
    pub first_name: Option<String>,
    /// Family name from the identity.
    pub last_name: Option<String>,
    /// Avatar from the identity.
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests;
