//! Driving port for owner-scoped portfolio edits.

use async_trait::async_trait;

use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, Error, Experience, ExperienceDraft,
    ExperienceId, Project, ProjectDraft, ProjectId, UserId,
};

/// Domain use-case port for projects, experiences, and contact methods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioCommand: Send + Sync {
    /// Add a project.
    async fn create_project(&self, owner: &UserId, draft: ProjectDraft) -> Result<Project, Error>;

    /// Replace a project owned by `owner`.
    async fn update_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, Error>;

    /// Delete a project owned by `owner`.
    async fn delete_project(&self, owner: &UserId, id: &ProjectId) -> Result<(), Error>;

    /// Remove one image from a project.
    async fn remove_project_image(
        &self,
        owner: &UserId,
        id: &ProjectId,
        image_url: String,
    ) -> Result<Project, Error>;

    /// Add an experience.
    async fn create_experience(
        &self,
        owner: &UserId,
        draft: ExperienceDraft,
    ) -> Result<Experience, Error>;

    /// Replace an experience owned by `owner`.
    async fn update_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        draft: ExperienceDraft,
    ) -> Result<Experience, Error>;

    /// Delete an experience owned by `owner`.
    async fn delete_experience(&self, owner: &UserId, id: &ExperienceId) -> Result<(), Error>;

    /// Remove one image from an experience.
    async fn remove_experience_image(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        image_url: String,
    ) -> Result<Experience, Error>;

    /// Add a contact method.
    async fn create_contact(
        &self,
        owner: &UserId,
        draft: ContactDraft,
    ) -> Result<ContactMethod, Error>;

    /// Replace a contact method owned by `owner`.
    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
        draft: ContactDraft,
    ) -> Result<ContactMethod, Error>;

    /// Delete a contact method owned by `owner`.
    async fn delete_contact(&self, owner: &UserId, id: &ContactMethodId) -> Result<(), Error>;
}
