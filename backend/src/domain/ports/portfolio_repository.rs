//! Port for projects, experiences, and contact methods.
//!
//! Every mutation is scoped to an owner. Adapters return `None`/`false` when
//! the record is missing or belongs to someone else, so callers cannot discover
//! other users' identifiers.
use async_trait::async_trait;

use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, Experience, ExperienceDraft, ExperienceId,
    Project, ProjectDraft, ProjectId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by portfolio repository adapters.
    pub enum PortfolioRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "portfolio repository connection failed: {message}",
        /// The transaction lost a serialisation race or deadlocked.
        Contention { message: String } => "portfolio repository contention: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "portfolio repository query failed: {message}",
    }
    transient: Connection, Contention
}

/// Owner-scoped storage for portfolio entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Projects of `owner`, newest first.
    async fn list_projects(&self, owner: &UserId) -> Result<Vec<Project>, PortfolioRepositoryError>;

    /// Insert a project.
    async fn create_project(
        &self,
        owner: &UserId,
        draft: &ProjectDraft,
    ) -> Result<Project, PortfolioRepositoryError>;

    /// Replace a project's fields.
    async fn update_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, PortfolioRepositoryError>;

    /// Delete a project. Returns whether a row was removed.
    async fn delete_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<bool, PortfolioRepositoryError>;

    /// Drop one image URL from a project.
    async fn remove_project_image(
        &self,
        owner: &UserId,
        id: &ProjectId,
        image_url: &str,
    ) -> Result<Option<Project>, PortfolioRepositoryError>;

    /// Experiences of `owner`, newest first.
    async fn list_experiences(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Experience>, PortfolioRepositoryError>;

    /// Insert an experience.
    async fn create_experience(
        &self,
        owner: &UserId,
        draft: &ExperienceDraft,
    ) -> Result<Experience, PortfolioRepositoryError>;

    /// Replace an experience's fields.
    async fn update_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        draft: &ExperienceDraft,
    ) -> Result<Option<Experience>, PortfolioRepositoryError>;

    /// Delete an experience. Returns whether a row was removed.
    async fn delete_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
    ) -> Result<bool, PortfolioRepositoryError>;

    /// Drop one image URL from an experience.
    async fn remove_experience_image(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        image_url: &str,
    ) -> Result<Option<Experience>, PortfolioRepositoryError>;

    /// Contact methods of `owner`.
    async fn list_contacts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ContactMethod>, PortfolioRepositoryError>;

    /// Insert a contact method.
    async fn create_contact(
        &self,
        owner: &UserId,
        draft: &ContactDraft,
    ) -> Result<ContactMethod, PortfolioRepositoryError>;

    /// Replace a contact method.
    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
        draft: &ContactDraft,
    ) -> Result<Option<ContactMethod>, PortfolioRepositoryError>;

    /// Delete a contact method. Returns whether a row was removed.
    async fn delete_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
    ) -> Result<bool, PortfolioRepositoryError>;
}
