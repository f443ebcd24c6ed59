//! Accounts and the follower graph.

use async_trait::async_trait;

use crate::domain::ports::{
    EMAIL_CONSTRAINT, FollowCounts, FollowRepository, FollowRepositoryError, SUBJECT_CONSTRAINT,
    USERNAME_CONSTRAINT, UserRepository, UserRepositoryError,
};
use crate::domain::{FullName, NewUser, ProfileUpdate, User, UserId, UserSummary, Username};

use super::{FollowEdge, InMemoryStore, Tables};

impl Tables {
    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| Some(user.id) != except && user.username.as_ref() == username)
    }

    fn summaries(&self, ids: impl Iterator<Item = UserId>) -> Vec<UserSummary> {
        ids.filter_map(|id| self.users.get(&id).map(User::summary))
            .collect()
    }

    /// Every follow edge, newest first.
    fn edges_newest_first(&self) -> Vec<&FollowEdge> {
        let mut edges: Vec<&FollowEdge> = self.follows.iter().collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        edges
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables()?.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let wanted = username.to_lowercase();
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.username.as_ref() == wanted)
            .cloned())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.external_subject == subject)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let wanted = email.to_lowercase();
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.email.to_lowercase() == wanted)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let username = user.username.as_ref().to_lowercase();
        if tables
            .users
            .values()
            .any(|existing| existing.external_subject == user.external_subject)
        {
            return Err(UserRepositoryError::duplicate(SUBJECT_CONSTRAINT));
        }
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(UserRepositoryError::duplicate(EMAIL_CONSTRAINT));
        }
        if tables.username_taken(&username, None) {
            return Err(UserRepositoryError::duplicate(USERNAME_CONSTRAINT));
        }
        let created_at = tables.stamp(now);
        let created = User {
            id: UserId::random(),
            external_subject: user.external_subject.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: Some(user.full_name.as_ref().to_owned()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            job_title: None,
            website: None,
            location: None,
            description: None,
            profile_image: user.profile_image.clone(),
            verified: false,
            onboarding_complete: false,
            created_at,
            updated_at: created_at,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if update
            .username
            .as_ref()
            .is_some_and(|username| tables.username_taken(username.as_ref(), Some(*id)))
        {
            return Err(UserRepositoryError::duplicate(USERNAME_CONSTRAINT));
        }
        let updated_at = tables.stamp(now);
        let Some(user) = tables.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(full_name) = &update.full_name {
            user.full_name = Some(full_name.as_ref().to_owned());
        }
        if let Some(job_title) = &update.job_title {
            user.job_title = Some(job_title.clone());
        }
        if let Some(website) = &update.website {
            user.website = Some(website.clone());
        }
        if let Some(location) = &update.location {
            user.location = Some(location.clone());
        }
        if let Some(description) = &update.description {
            user.description = Some(description.clone());
        }
        user.updated_at = updated_at;
        Ok(Some(user.clone()))
    }

    async fn complete_onboarding(
        &self,
        id: &UserId,
        username: &Username,
        full_name: &FullName,
    ) -> Result<Option<User>, UserRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if tables.username_taken(username.as_ref(), Some(*id)) {
            return Err(UserRepositoryError::duplicate(USERNAME_CONSTRAINT));
        }
        let updated_at = tables.stamp(now);
        let Some(user) = tables.users.get_mut(id) else {
            return Ok(None);
        };
        user.username = username.clone();
        user.full_name = Some(full_name.as_ref().to_owned());
        user.onboarding_complete = true;
        user.updated_at = updated_at;
        Ok(Some(user.clone()))
    }

    async fn update_image(
        &self,
        id: &UserId,
        image_url: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let updated_at = tables.stamp(now);
        Ok(tables.users.get_mut(id).map(|user| {
            user.profile_image = Some(image_url.to_owned());
            user.updated_at = updated_at;
            user.clone()
        }))
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn toggle(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if !tables.users.contains_key(follower) || !tables.users.contains_key(following) {
            return Err(FollowRepositoryError::query("follow edge references a missing user"));
        }
        let before = tables.follows.len();
        tables
            .follows
            .retain(|edge| !(edge.follower == *follower && edge.following == *following));
        if tables.follows.len() < before {
            return Ok(false);
        }
        let created_at = tables.stamp(now);
        tables.follows.push(FollowEdge {
            follower: *follower,
            following: *following,
            created_at,
        });
        Ok(true)
    }

    async fn is_following(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .tables()?
            .follows
            .iter()
            .any(|edge| edge.follower == *follower && edge.following == *following))
    }

    async fn followed_among(
        &self,
        follower: &UserId,
        candidates: &[UserId],
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        Ok(self
            .tables()?
            .follows
            .iter()
            .filter(|edge| edge.follower == *follower && candidates.contains(&edge.following))
            .map(|edge| edge.following)
            .collect())
    }

    async fn followers(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError> {
        let tables = self.tables()?;
        let ids = tables
            .edges_newest_first()
            .into_iter()
            .filter(|edge| edge.following == *user)
            .map(|edge| edge.follower);
        Ok(tables.summaries(ids))
    }

    async fn following(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError> {
        let tables = self.tables()?;
        let ids = tables
            .edges_newest_first()
            .into_iter()
            .filter(|edge| edge.follower == *user)
            .map(|edge| edge.following);
        Ok(tables.summaries(ids))
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowRepositoryError> {
        let tables = self.tables()?;
        let (followers, following) =
            tables
                .follows
                .iter()
                .fold((0_u64, 0_u64), |(followers, following), edge| {
                    (
                        followers + u64::from(edge.following == *user),
                        following + u64::from(edge.follower == *user),
                    )
                });
        Ok(FollowCounts {
            followers,
            following,
        })
    }
}
