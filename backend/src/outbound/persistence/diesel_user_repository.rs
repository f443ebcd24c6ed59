//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Usernames are written lowercase and compared through `lower(username)`
//! so lookups use the `users_username_lower_key` index. Unique violations
//! surface as [`UserRepositoryError::Duplicate`] carrying the constraint
//! name for the onboarding service to interpret.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{FullName, NewUser, ProfileUpdate, User, UserId, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::diesel_helpers::{load_optional, lower};
use super::models::{NewUserRow, ProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn convert(row: Option<UserRow>) -> Result<Option<User>, UserRepositoryError> {
    Ok(row.map(User::try_from).transpose().map_err(map_row_error)?)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        load_optional!(self, users::table.filter(users::id.eq(id.as_uuid())), UserRow)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let needle = username.trim().to_lowercase();
        load_optional!(
            self,
            users::table.filter(lower(users::username).eq(needle)),
            UserRow
        )
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserRepositoryError> {
        load_optional!(
            self,
            users::table.filter(users::external_subject.eq(subject)),
            UserRow
        )
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let needle = email.trim().to_lowercase();
        load_optional!(
            self,
            users::table.filter(lower(users::email).eq(needle)),
            UserRow
        )
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let username = user.username.as_ref().to_lowercase();
        let row = NewUserRow {
            id: Uuid::new_v4(),
            external_subject: &user.external_subject,
            email: &user.email,
            username: &username,
            full_name: user.full_name.as_ref(),
            first_name: user.first_name.as_deref(),
            last_name: user.last_name.as_deref(),
            profile_image: user.profile_image.as_deref(),
        };
        let created: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(User::try_from(created).map_err(map_row_error)?)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let username = update
            .username
            .as_ref()
            .map(|name| name.as_ref().to_lowercase());
        let changes = ProfileChangeset {
            username: username.as_deref(),
            full_name: update.full_name.as_ref().map(AsRef::as_ref),
            job_title: update.job_title.as_deref(),
            website: update.website.as_deref(),
            location: update.location.as_deref(),
            description: update.description.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn complete_onboarding(
        &self,
        id: &UserId,
        username: &Username,
        full_name: &FullName,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::username.eq(username.as_ref().to_lowercase()),
                users::full_name.eq(full_name.as_ref()),
                users::onboarding_complete.eq(true),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn update_image(
        &self,
        id: &UserId,
        image_url: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::profile_image.eq(image_url),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert(row)
    }
}
