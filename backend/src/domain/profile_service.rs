//! Profile reads, profile edits, and the follow graph.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    CacheTag, FeedCache, FollowRepository, PortfolioRepository, PostRepository, ProfileCommand,
    ProfileQuery, USERNAME_CONSTRAINT, UserRepository, UserRepositoryError,
};
use crate::domain::service_errors::{
    log_cache_error, map_follow_error, map_portfolio_error, map_post_error, map_user_error,
};
use crate::domain::web_url::{HTTP_SCHEMES, parse_web_url};
use crate::domain::{
    Error, FollowLists, ProfileCounts, ProfileUpdate, User, UserId, UserProfile,
};

/// Largest id list accepted by follow-status lookups.
pub const FOLLOW_STATUS_MAX: usize = 100;

const USER_NOT_FOUND: &str = "User not found";
const USERNAME_TAKEN: &str = "That username is taken. Please try another.";

fn map_update_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Duplicate { constraint } if constraint == USERNAME_CONSTRAINT => {
            Error::conflict(USERNAME_TAKEN)
        }
        other => map_user_error(other),
    }
}

/// Service implementing [`ProfileQuery`] and [`ProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<U, F, P, Q, C> {
    users: Arc<U>,
    follows: Arc<F>,
    portfolio: Arc<P>,
    posts: Arc<Q>,
    cache: Arc<C>,
}

impl<U, F, P, Q, C> ProfileService<U, F, P, Q, C> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        follows: Arc<F>,
        portfolio: Arc<P>,
        posts: Arc<Q>,
        cache: Arc<C>,
    ) -> Self {
        Self {
            users,
            follows,
            portfolio,
            posts,
            cache,
        }
    }
}

impl<U, F, P, Q, C> ProfileService<U, F, P, Q, C>
where
    U: UserRepository,
    F: FollowRepository,
    P: PortfolioRepository,
    Q: PostRepository,
    C: FeedCache,
{
    async fn require_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn assemble(&self, user: User, viewer: Option<UserId>) -> Result<UserProfile, Error> {
        let owner = user.id;
        let (contacts, projects, experiences, follow_counts, posts, is_following) = try_join!(
            async {
                self.portfolio
                    .list_contacts(&owner)
                    .await
                    .map_err(map_portfolio_error)
            },
            async {
                self.portfolio
                    .list_projects(&owner)
                    .await
                    .map_err(map_portfolio_error)
            },
            async {
                self.portfolio
                    .list_experiences(&owner)
                    .await
                    .map_err(map_portfolio_error)
            },
            async { self.follows.counts(&owner).await.map_err(map_follow_error) },
            async {
                self.posts
                    .count_by_author(&owner)
                    .await
                    .map_err(map_post_error)
            },
            async {
                match viewer {
                    Some(viewer) if viewer == owner => Ok(Some(false)),
                    Some(viewer) => self
                        .follows
                        .is_following(&viewer, &owner)
                        .await
                        .map(Some)
                        .map_err(map_follow_error),
                    None => Ok(None),
                }
            },
        )?;
        Ok(UserProfile {
            user,
            contacts,
            projects,
            experiences,
            counts: ProfileCounts {
                followers: follow_counts.followers,
                following: follow_counts.following,
                posts,
            },
            is_following,
        })
    }

    async fn invalidate(&self, tags: &[CacheTag]) {
        if let Err(error) = self.cache.invalidate(tags).await {
            log_cache_error("invalidate", &error);
        }
    }
}

#[async_trait]
impl<U, F, P, Q, C> ProfileQuery for ProfileService<U, F, P, Q, C>
where
    U: UserRepository,
    F: FollowRepository,
    P: PortfolioRepository,
    Q: PostRepository,
    C: FeedCache,
{
    async fn profile(
        &self,
        username_or_id: &str,
        viewer: Option<UserId>,
    ) -> Result<UserProfile, Error> {
        let key = username_or_id.trim();
        let found = match Uuid::parse_str(key) {
            Ok(uuid) => self.users.find_by_id(&UserId::from_uuid(uuid)).await,
            Err(_) => {
                self.users
                    .find_by_username(&key.to_ascii_lowercase())
                    .await
            }
        }
        .map_err(map_user_error)?;
        let user = found.ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        self.assemble(user, viewer).await
    }

    async fn profile_by_id(
        &self,
        user_id: &UserId,
        viewer: Option<UserId>,
    ) -> Result<UserProfile, Error> {
        let user = self.require_user(user_id).await?;
        self.assemble(user, viewer).await
    }

    async fn follow_lists(&self, user_id: &UserId) -> Result<FollowLists, Error> {
        self.require_user(user_id).await?;
        let (followers, following) = try_join!(
            async { self.follows.followers(user_id).await.map_err(map_follow_error) },
            async { self.follows.following(user_id).await.map_err(map_follow_error) },
        )?;
        Ok(FollowLists {
            followers,
            following,
        })
    }

    async fn follow_status(
        &self,
        viewer: Option<UserId>,
        user_ids: Vec<UserId>,
    ) -> Result<HashMap<UserId, bool>, Error> {
        let Some(viewer) = viewer else {
            return Ok(HashMap::new());
        };
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        if user_ids.len() > FOLLOW_STATUS_MAX {
            return Err(Error::invalid_request(format!(
                "at most {FOLLOW_STATUS_MAX} user ids may be checked at once"
            )));
        }
        let followed = self
            .follows
            .followed_among(&viewer, &user_ids)
            .await
            .map_err(map_follow_error)?;
        Ok(user_ids
            .into_iter()
            .map(|id| (id, followed.contains(&id)))
            .collect())
    }
}

#[async_trait]
impl<U, F, P, Q, C> ProfileCommand for ProfileService<U, F, P, Q, C>
where
    U: UserRepository,
    F: FollowRepository,
    P: PortfolioRepository,
    Q: PostRepository,
    C: FeedCache,
{
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        if update.is_empty() {
            return self.require_user(user_id).await;
        }
        if let Some(username) = &update.username {
            let owner = self
                .users
                .find_by_username(username.as_ref())
                .await
                .map_err(map_user_error)?;
            if owner.is_some_and(|owner| owner.id != *user_id) {
                return Err(Error::conflict(USERNAME_TAKEN));
            }
        }
        let user = self
            .users
            .update_profile(user_id, &update)
            .await
            .map_err(map_update_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        // Author cards are embedded in cached feed pages.
        self.invalidate(&[CacheTag::Posts]).await;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    async fn update_image(&self, user_id: &UserId, image_url: String) -> Result<User, Error> {
        let image_url = parse_web_url(&image_url, HTTP_SCHEMES).map_err(|error| {
            Error::invalid_request(format!("image url {error}"))
        })?;
        let user = self
            .users
            .update_image(user_id, &image_url)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        self.invalidate(&[CacheTag::Posts]).await;
        Ok(user)
    }

    async fn toggle_follow(&self, user_id: &UserId, target: &UserId) -> Result<bool, Error> {
        if user_id == target {
            return Err(Error::invalid_request("You cannot follow yourself"));
        }
        self.require_user(target).await?;
        let following = self
            .follows
            .toggle(user_id, target)
            .await
            .map_err(map_follow_error)?;
        self.invalidate(&[CacheTag::Viewer(*user_id)]).await;
        info!(follower = %user_id, target = %target, following, "follow toggled");
        Ok(following)
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
