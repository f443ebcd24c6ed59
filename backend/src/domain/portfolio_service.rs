//! Owner-scoped edits to projects, experiences, and contact methods.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{PortfolioCommand, PortfolioRepository};
use crate::domain::service_errors::map_portfolio_error;
use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, Error, Experience, ExperienceDraft,
    ExperienceId, Project, ProjectDraft, ProjectId, UserId,
};

const PROJECT_NOT_FOUND: &str = "Project not found or you do not have permission to edit it";
const EXPERIENCE_NOT_FOUND: &str =
    "Experience not found or you do not have permission to edit it";
const CONTACT_NOT_FOUND: &str =
    "Contact method not found or you do not have permission to edit it";

fn found<T>(value: Option<T>, message: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| Error::not_found(message))
}

fn deleted(removed: bool, message: &'static str) -> Result<(), Error> {
    if removed {
        Ok(())
    } else {
        Err(Error::not_found(message))
    }
}

/// Service implementing [`PortfolioCommand`].
#[derive(Clone)]
pub struct PortfolioService<R> {
    repo: Arc<R>,
}

impl<R> PortfolioService<R> {
    /// Create a new service.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> PortfolioCommand for PortfolioService<R>
where
    R: PortfolioRepository,
{
    async fn create_project(&self, owner: &UserId, draft: ProjectDraft) -> Result<Project, Error> {
        let project = self
            .repo
            .create_project(owner, &draft)
            .await
            .map_err(map_portfolio_error)?;
        info!(project_id = %project.id, owner = %owner, "project created");
        Ok(project)
    }

    async fn update_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, Error> {
        let updated = self
            .repo
            .update_project(owner, id, &draft)
            .await
            .map_err(map_portfolio_error)?;
        found(updated, PROJECT_NOT_FOUND)
    }

    async fn delete_project(&self, owner: &UserId, id: &ProjectId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_project(owner, id)
            .await
            .map_err(map_portfolio_error)?;
        deleted(removed, PROJECT_NOT_FOUND)
    }

    async fn remove_project_image(
        &self,
        owner: &UserId,
        id: &ProjectId,
        image_url: String,
    ) -> Result<Project, Error> {
        let updated = self
            .repo
            .remove_project_image(owner, id, image_url.trim())
            .await
            .map_err(map_portfolio_error)?;
        found(updated, PROJECT_NOT_FOUND)
    }

    async fn create_experience(
        &self,
        owner: &UserId,
        draft: ExperienceDraft,
    ) -> Result<Experience, Error> {
        let experience = self
            .repo
            .create_experience(owner, &draft)
            .await
            .map_err(map_portfolio_error)?;
        info!(experience_id = %experience.id, owner = %owner, "experience created");
        Ok(experience)
    }

    async fn update_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        draft: ExperienceDraft,
    ) -> Result<Experience, Error> {
        let updated = self
            .repo
            .update_experience(owner, id, &draft)
            .await
            .map_err(map_portfolio_error)?;
        found(updated, EXPERIENCE_NOT_FOUND)
    }

    async fn delete_experience(&self, owner: &UserId, id: &ExperienceId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_experience(owner, id)
            .await
            .map_err(map_portfolio_error)?;
        deleted(removed, EXPERIENCE_NOT_FOUND)
    }

    async fn remove_experience_image(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        image_url: String,
    ) -> Result<Experience, Error> {
        let updated = self
            .repo
            .remove_experience_image(owner, id, image_url.trim())
            .await
            .map_err(map_portfolio_error)?;
        found(updated, EXPERIENCE_NOT_FOUND)
    }

    async fn create_contact(
        &self,
        owner: &UserId,
        draft: ContactDraft,
    ) -> Result<ContactMethod, Error> {
        self.repo
            .create_contact(owner, &draft)
            .await
            .map_err(map_portfolio_error)
    }

    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
        draft: ContactDraft,
    ) -> Result<ContactMethod, Error> {
        let updated = self
            .repo
            .update_contact(owner, id, &draft)
            .await
            .map_err(map_portfolio_error)?;
        found(updated, CONTACT_NOT_FOUND)
    }

    async fn delete_contact(&self, owner: &UserId, id: &ContactMethodId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_contact(owner, id)
            .await
            .map_err(map_portfolio_error)?;
        deleted(removed, CONTACT_NOT_FOUND)
    }
}
