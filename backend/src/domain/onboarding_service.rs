//! Onboarding: username suggestions, account creation, and completion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    EMAIL_CONSTRAINT, OnboardingCommand, SUBJECT_CONSTRAINT, USERNAME_CONSTRAINT,
    UserRepository, UserRepositoryError,
};
use crate::domain::service_errors::map_user_error;
use crate::domain::{
    Error, ExternalIdentity, FullName, NewUser, ONBOARDING_USERNAME_MAX, User, UserId, Username,
};

const USERNAME_TAKEN: &str = "That username is taken. Please try another.";
const USER_EXISTS: &str = "User already exists";
const SUFFIX_RANGE: std::ops::RangeInclusive<u8> = 1..=99;

/// Strip an email's local part down to ASCII letters and digits, lowercased.
///
/// # Examples
/// ```
/// use whoami::domain::username_base;
///
/// assert_eq!(username_base("Ada.Lovelace+news@example.com"), "adalovelacenews");
/// ```
pub fn username_base(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    // Two characters are reserved for the numeric suffix.
    let stem: String = base.chars().take(ONBOARDING_USERNAME_MAX - 2).collect();
    std::iter::once(base.chars().take(ONBOARDING_USERNAME_MAX).collect())
        .chain(SUFFIX_RANGE.map(move |suffix| format!("{stem}{suffix:02}")))
}

fn map_create_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Duplicate { constraint } if constraint == USERNAME_CONSTRAINT => {
            Error::conflict(USERNAME_TAKEN)
        }
        UserRepositoryError::Duplicate { constraint }
            if constraint == EMAIL_CONSTRAINT || constraint == SUBJECT_CONSTRAINT =>
        {
            Error::conflict(USER_EXISTS)
        }
        other => map_user_error(other),
    }
}

/// Service implementing [`OnboardingCommand`].
#[derive(Clone)]
pub struct OnboardingService<U> {
    users: Arc<U>,
}

impl<U> OnboardingService<U> {
    /// Create a new service.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> OnboardingService<U>
where
    U: UserRepository,
{
    async fn username_owner(&self, username: &str) -> Result<Option<UserId>, Error> {
        Ok(self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .map(|user| user.id))
    }
}

#[async_trait]
impl<U> OnboardingCommand for OnboardingService<U>
where
    U: UserRepository,
{
    async fn suggest_username(&self, identity: &ExternalIdentity) -> Result<Username, Error> {
        let base = username_base(&identity.email);
        if base.is_empty() {
            return Err(Error::invalid_request(
                "email does not contain characters usable in a username",
            ));
        }
        for candidate in candidates(&base) {
            let Ok(username) = Username::for_onboarding(candidate) else {
                continue;
            };
            if self.username_owner(username.as_ref()).await?.is_none() {
                return Ok(username);
            }
        }
        Err(Error::conflict("Unable to generate unique username"))
    }

    async fn setup_account(
        &self,
        identity: &ExternalIdentity,
        username: Username,
        full_name: FullName,
    ) -> Result<User, Error> {
        let existing_subject = self
            .users
            .find_by_subject(&identity.subject)
            .await
            .map_err(map_user_error)?;
        let existing_email = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_error)?;
        if existing_subject.is_some() || existing_email.is_some() {
            return Err(Error::conflict(USER_EXISTS));
        }
        if self.username_owner(username.as_ref()).await?.is_some() {
            return Err(Error::conflict(USERNAME_TAKEN));
        }

        let new_user = NewUser {
            external_subject: identity.subject.clone(),
            email: identity.email.clone(),
            username,
            full_name,
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            profile_image: identity.image_url.clone(),
        };
        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(map_create_error)?;
        info!(user_id = %user.id, username = %user.username, "account created");
        Ok(user)
    }

    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        username: Username,
        full_name: FullName,
    ) -> Result<User, Error> {
        let owner = self.username_owner(username.as_ref()).await?;
        if owner.is_some_and(|owner| owner != *user_id) {
            return Err(Error::conflict(USERNAME_TAKEN));
        }
        self.users
            .complete_onboarding(user_id, &username, &full_name)
            .await
            .map_err(map_create_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "onboarding_service_tests.rs"]
mod tests;
