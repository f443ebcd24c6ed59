//! PostgreSQL-backed `PortfolioRepository` implementation using Diesel ORM.
//!
//! Every mutation filters on both the record id and the owner, so records
//! belonging to someone else behave exactly like missing ones.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PortfolioRepository, PortfolioRepositoryError};
use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, Experience, ExperienceDraft, ExperienceId,
    Project, ProjectDraft, ProjectId, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::diesel_helpers::load_vec;
use super::models::{
    ContactRow, ContactWrite, ExperienceRow, ExperienceWrite, ProjectRow, ProjectWrite,
};
use super::pool::DbPool;
use super::schema::{contact_methods, experiences, projects};

/// Diesel-backed implementation of the `PortfolioRepository` port.
#[derive(Clone)]
pub struct DieselPortfolioRepository {
    pool: DbPool,
}

impl DieselPortfolioRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn project_write(draft: &ProjectDraft) -> ProjectWrite<'_> {
    ProjectWrite {
        title: &draft.title,
        description: draft.description.as_deref(),
        url: draft.url.as_deref(),
        client: draft.client.as_deref(),
        start_month: draft.start_month.as_str(),
        start_year: draft.start_year.to_string(),
        images: &draft.images,
        updated_at: Utc::now(),
    }
}

fn experience_write(draft: &ExperienceDraft) -> ExperienceWrite<'_> {
    ExperienceWrite {
        title: &draft.title,
        company: &draft.company,
        description: &draft.description,
        url: draft.url.as_deref(),
        start_month: draft.start_month.as_str(),
        start_year: draft.start_year.to_string(),
        end_month: draft.end_month.map(|month| month.as_str()),
        end_year: draft.end_year.map(|year| year.to_string()),
        images: &draft.images,
        updated_at: Utc::now(),
    }
}

fn contact_write(draft: &ContactDraft) -> ContactWrite<'_> {
    ContactWrite {
        contact_type: draft.kind.as_str(),
        contact_username: &draft.contact_username,
        url: draft.url(),
    }
}

fn convert<R, T>(row: Option<R>) -> Result<Option<T>, PortfolioRepositoryError>
where
    T: TryFrom<R, Error = String>,
{
    Ok(row.map(T::try_from).transpose().map_err(map_row_error)?)
}

fn without(images: &[String], image_url: &str) -> Vec<String> {
    images
        .iter()
        .filter(|image| image.as_str() != image_url)
        .cloned()
        .collect()
}

#[async_trait]
impl PortfolioRepository for DieselPortfolioRepository {
    async fn list_projects(&self, owner: &UserId) -> Result<Vec<Project>, PortfolioRepositoryError> {
        load_vec!(
            self,
            projects::table
                .filter(projects::author_id.eq(owner.as_uuid()))
                .order_by((projects::created_at.desc(), projects::id.desc())),
            ProjectRow
        )
    }

    async fn create_project(
        &self,
        owner: &UserId,
        draft: &ProjectDraft,
    ) -> Result<Project, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ProjectRow = diesel::insert_into(projects::table)
            .values((
                projects::id.eq(Uuid::new_v4()),
                projects::author_id.eq(owner.as_uuid()),
                project_write(draft),
            ))
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Project::try_from(row).map_err(map_row_error)?)
    }

    async fn update_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProjectRow> = diesel::update(
            projects::table
                .filter(projects::id.eq(id.as_uuid()))
                .filter(projects::author_id.eq(owner.as_uuid())),
        )
        .set(project_write(draft))
        .returning(ProjectRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn delete_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            projects::table
                .filter(projects::id.eq(id.as_uuid()))
                .filter(projects::author_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn remove_project_image(
        &self,
        owner: &UserId,
        id: &ProjectId,
        image_url: &str,
    ) -> Result<Option<Project>, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = projects::table
            .filter(projects::id.eq(id.as_uuid()))
            .filter(projects::author_id.eq(owner.as_uuid()));
        let current: Option<Vec<String>> = target
            .clone()
            .select(projects::images)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(current) = current else {
            return Ok(None);
        };
        let row: Option<ProjectRow> = diesel::update(target)
            .set((
                projects::images.eq(without(&current, image_url)),
                projects::updated_at.eq(Utc::now()),
            ))
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn list_experiences(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Experience>, PortfolioRepositoryError> {
        load_vec!(
            self,
            experiences::table
                .filter(experiences::author_id.eq(owner.as_uuid()))
                .order_by((experiences::created_at.desc(), experiences::id.desc())),
            ExperienceRow
        )
    }

    async fn create_experience(
        &self,
        owner: &UserId,
        draft: &ExperienceDraft,
    ) -> Result<Experience, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ExperienceRow = diesel::insert_into(experiences::table)
            .values((
                experiences::id.eq(Uuid::new_v4()),
                experiences::author_id.eq(owner.as_uuid()),
                experience_write(draft),
            ))
            .returning(ExperienceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Experience::try_from(row).map_err(map_row_error)?)
    }

    async fn update_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        draft: &ExperienceDraft,
    ) -> Result<Option<Experience>, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExperienceRow> = diesel::update(
            experiences::table
                .filter(experiences::id.eq(id.as_uuid()))
                .filter(experiences::author_id.eq(owner.as_uuid())),
        )
        .set(experience_write(draft))
        .returning(ExperienceRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn delete_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            experiences::table
                .filter(experiences::id.eq(id.as_uuid()))
                .filter(experiences::author_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn remove_experience_image(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        image_url: &str,
    ) -> Result<Option<Experience>, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = experiences::table
            .filter(experiences::id.eq(id.as_uuid()))
            .filter(experiences::author_id.eq(owner.as_uuid()));
        let current: Option<Vec<String>> = target
            .clone()
            .select(experiences::images)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(current) = current else {
            return Ok(None);
        };
        let row: Option<ExperienceRow> = diesel::update(target)
            .set((
                experiences::images.eq(without(&current, image_url)),
                experiences::updated_at.eq(Utc::now()),
            ))
            .returning(ExperienceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn list_contacts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ContactMethod>, PortfolioRepositoryError> {
        load_vec!(
            self,
            contact_methods::table
                .filter(contact_methods::user_id.eq(owner.as_uuid()))
                .order_by((contact_methods::created_at.asc(), contact_methods::id.asc())),
            ContactRow
        )
    }

    async fn create_contact(
        &self,
        owner: &UserId,
        draft: &ContactDraft,
    ) -> Result<ContactMethod, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ContactRow = diesel::insert_into(contact_methods::table)
            .values((
                contact_methods::id.eq(Uuid::new_v4()),
                contact_methods::user_id.eq(owner.as_uuid()),
                contact_write(draft),
            ))
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ContactMethod::try_from(row).map_err(map_row_error)?)
    }

    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
        draft: &ContactDraft,
    ) -> Result<Option<ContactMethod>, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContactRow> = diesel::update(
            contact_methods::table
                .filter(contact_methods::id.eq(id.as_uuid()))
                .filter(contact_methods::user_id.eq(owner.as_uuid())),
        )
        .set(contact_write(draft))
        .returning(ContactRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn delete_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            contact_methods::table
                .filter(contact_methods::id.eq(id.as_uuid()))
                .filter(contact_methods::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactType, Month, Year};
    use rstest::rstest;

    #[rstest]
    fn removing_an_image_keeps_the_others_in_order() {
        let images = vec![
            "https://img.example/a.png".to_owned(),
            "https://img.example/b.png".to_owned(),
            "https://img.example/a.png".to_owned(),
            "https://img.example/c.png".to_owned(),
        ];
        assert_eq!(
            without(&images, "https://img.example/a.png"),
            vec![
                "https://img.example/b.png".to_owned(),
                "https://img.example/c.png".to_owned()
            ]
        );
    }

    #[rstest]
    fn experience_writes_use_database_spellings() {
        let draft = ExperienceDraft {
            title: "Engineer".to_owned(),
            company: "Analytical Engines".to_owned(),
            description: "Notes".to_owned(),
            url: None,
            start_month: Month::March,
            start_year: Year::parse("2020", "startYear").expect("year"),
            end_month: Some(Month::June),
            end_year: None,
            images: vec![],
        };
        let write = experience_write(&draft);
        assert_eq!(write.start_month, "MARCH");
        assert_eq!(write.start_year, "2020");
        assert_eq!(write.end_month, Some("JUNE"));
        assert!(write.end_year.is_none());
    }

    #[rstest]
    fn contact_writes_derive_the_link() {
        let draft = ContactDraft::new(Some(ContactType::Github), "ada").expect("draft");
        let write = contact_write(&draft);
        assert_eq!(write.contact_type, "GITHUB");
        assert_eq!(write.url, "https://github.com/ada");
    }
}
