//! Public profile read model and profile edits.

use serde::{Deserialize, Serialize};

use super::web_url::{HTTP_SCHEMES, parse_web_url};
use super::{ContactMethod, Experience, FullName, Project, User, UserSummary, Username};

/// Maximum biography length in characters.
pub const DESCRIPTION_MAX: usize = 500;

/// Validation failures for profile edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// The website was not an absolute http(s) URL.
    #[error("website must be an absolute http(s) URL")]
    InvalidWebsite,
    /// The biography exceeded [`DESCRIPTION_MAX`].
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Partial profile edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New handle.
    pub username: Option<Username>,
    /// New display name.
    pub full_name: Option<FullName>,
    /// New headline.
    pub job_title: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New biography.
    pub description: Option<String>,
}

impl ProfileUpdate {
    /// Validate and normalise a website URL.
    pub fn website(raw: &str) -> Result<String, ProfileValidationError> {
        parse_web_url(raw, HTTP_SCHEMES).map_err(|_| ProfileValidationError::InvalidWebsite)
    }

    /// Validate a biography.
    pub fn description(raw: &str) -> Result<String, ProfileValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > DESCRIPTION_MAX {
            return Err(ProfileValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(trimmed.to_owned())
    }

    /// Whether the edit changes anything.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Aggregate counters shown on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    /// Users following this user.
    pub followers: u64,
    /// Users this user follows.
    pub following: u64,
    /// Posts authored, replies included.
    pub posts: u64,
}

/// Profile page read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The user.
    pub user: User,
    /// Contact links.
    pub contacts: Vec<ContactMethod>,
    /// Projects, newest first.
    pub projects: Vec<Project>,
    /// Work history, newest first.
    pub experiences: Vec<Experience>,
    /// Counters.
    pub counts: ProfileCounts,
    /// Whether the viewer follows this user; `None` for anonymous viewers.
    pub is_following: Option<bool>,
}

/// Follower and following lists for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowLists {
    /// Users following the subject.
    pub followers: Vec<UserSummary>,
    /// Users the subject follows.
    pub following: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn website_must_be_http() {
        assert!(ProfileUpdate::website("https://ada.dev").is_ok());
        assert_eq!(
            ProfileUpdate::website("ada.dev"),
            Err(ProfileValidationError::InvalidWebsite)
        );
    }

    #[rstest]
    fn description_is_capped() {
        assert!(ProfileUpdate::description(&"x".repeat(DESCRIPTION_MAX)).is_ok());
        assert_eq!(
            ProfileUpdate::description(&"x".repeat(DESCRIPTION_MAX + 1)),
            Err(ProfileValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX
            })
        );
    }

    #[rstest]
    fn default_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            location: Some("London".to_owned()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
