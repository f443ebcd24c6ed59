//! Projects, experiences, and contact methods.

use async_trait::async_trait;

use crate::domain::ports::{PortfolioRepository, PortfolioRepositoryError};
use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, Experience, ExperienceDraft, ExperienceId,
    Project, ProjectDraft, ProjectId, UserId,
};

use super::InMemoryStore;

fn apply_project(project: &mut Project, draft: &ProjectDraft) {
    project.title = draft.title.clone();
    project.description = draft.description.clone();
    project.url = draft.url.clone();
    project.client = draft.client.clone();
    project.start_month = draft.start_month;
    project.start_year = draft.start_year;
    project.images = draft.images.clone();
}

fn apply_experience(experience: &mut Experience, draft: &ExperienceDraft) {
    experience.title = draft.title.clone();
    experience.company = draft.company.clone();
    experience.description = draft.description.clone();
    experience.url = draft.url.clone();
    experience.start_month = draft.start_month;
    experience.start_year = draft.start_year;
    experience.end_month = draft.end_month;
    experience.end_year = draft.end_year;
    experience.images = draft.images.clone();
}

fn apply_contact(contact: &mut ContactMethod, draft: &ContactDraft) {
    contact.kind = draft.kind;
    contact.contact_username = draft.contact_username.clone();
    contact.url = draft.url();
}

#[async_trait]
impl PortfolioRepository for InMemoryStore {
    async fn list_projects(&self, owner: &UserId) -> Result<Vec<Project>, PortfolioRepositoryError> {
        let tables = self.tables()?;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|project| project.author_id == *owner)
            .cloned()
            .collect();
        projects.sort_by(|a, b| {
            (b.created_at, b.id.as_uuid()).cmp(&(a.created_at, a.id.as_uuid()))
        });
        Ok(projects)
    }

    async fn create_project(
        &self,
        owner: &UserId,
        draft: &ProjectDraft,
    ) -> Result<Project, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let created_at = tables.stamp(now);
        let project = Project {
            id: ProjectId::random(),
            author_id: *owner,
            title: draft.title.clone(),
            description: draft.description.clone(),
            url: draft.url.clone(),
            client: draft.client.clone(),
            start_month: draft.start_month,
            start_year: draft.start_year,
            images: draft.images.clone(),
            created_at,
            updated_at: created_at,
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let updated_at = tables.stamp(now);
        Ok(tables
            .projects
            .get_mut(id)
            .filter(|project| project.author_id == *owner)
            .map(|project| {
                apply_project(project, draft);
                project.updated_at = updated_at;
                project.clone()
            }))
    }

    async fn delete_project(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut tables = self.tables()?;
        let owned = tables
            .projects
            .get(id)
            .is_some_and(|project| project.author_id == *owner);
        Ok(owned && tables.projects.remove(id).is_some())
    }

    async fn remove_project_image(
        &self,
        owner: &UserId,
        id: &ProjectId,
        image_url: &str,
    ) -> Result<Option<Project>, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let updated_at = tables.stamp(now);
        Ok(tables
            .projects
            .get_mut(id)
            .filter(|project| project.author_id == *owner)
            .map(|project| {
                project.images.retain(|image| image != image_url);
                project.updated_at = updated_at;
                project.clone()
            }))
    }

    async fn list_experiences(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Experience>, PortfolioRepositoryError> {
        let tables = self.tables()?;
        let mut experiences: Vec<Experience> = tables
            .experiences
            .values()
            .filter(|experience| experience.author_id == *owner)
            .cloned()
            .collect();
        experiences.sort_by(|a, b| {
            (b.created_at, b.id.as_uuid()).cmp(&(a.created_at, a.id.as_uuid()))
        });
        Ok(experiences)
    }

    async fn create_experience(
        &self,
        owner: &UserId,
        draft: &ExperienceDraft,
    ) -> Result<Experience, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let created_at = tables.stamp(now);
        let experience = Experience {
            id: ExperienceId::random(),
            author_id: *owner,
            title: draft.title.clone(),
            company: draft.company.clone(),
            description: draft.description.clone(),
            url: draft.url.clone(),
            start_month: draft.start_month,
            start_year: draft.start_year,
            end_month: draft.end_month,
            end_year: draft.end_year,
            images: draft.images.clone(),
            created_at,
            updated_at: created_at,
        };
        tables.experiences.insert(experience.id, experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        draft: &ExperienceDraft,
    ) -> Result<Option<Experience>, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let updated_at = tables.stamp(now);
        Ok(tables
            .experiences
            .get_mut(id)
            .filter(|experience| experience.author_id == *owner)
            .map(|experience| {
                apply_experience(experience, draft);
                experience.updated_at = updated_at;
                experience.clone()
            }))
    }

    async fn delete_experience(
        &self,
        owner: &UserId,
        id: &ExperienceId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut tables = self.tables()?;
        let owned = tables
            .experiences
            .get(id)
            .is_some_and(|experience| experience.author_id == *owner);
        Ok(owned && tables.experiences.remove(id).is_some())
    }

    async fn remove_experience_image(
        &self,
        owner: &UserId,
        id: &ExperienceId,
        image_url: &str,
    ) -> Result<Option<Experience>, PortfolioRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let updated_at = tables.stamp(now);
        Ok(tables
            .experiences
            .get_mut(id)
            .filter(|experience| experience.author_id == *owner)
            .map(|experience| {
                experience.images.retain(|image| image != image_url);
                experience.updated_at = updated_at;
                experience.clone()
            }))
    }

    async fn list_contacts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ContactMethod>, PortfolioRepositoryError> {
        Ok(self
            .tables()?
            .contacts
            .iter()
            .filter(|contact| contact.user_id == *owner)
            .cloned()
            .collect())
    }

    async fn create_contact(
        &self,
        owner: &UserId,
        draft: &ContactDraft,
    ) -> Result<ContactMethod, PortfolioRepositoryError> {
        let contact = ContactMethod {
            id: ContactMethodId::random(),
            user_id: *owner,
            kind: draft.kind,
            contact_username: draft.contact_username.clone(),
            url: draft.url(),
        };
        self.tables()?.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
        draft: &ContactDraft,
    ) -> Result<Option<ContactMethod>, PortfolioRepositoryError> {
        let mut tables = self.tables()?;
        Ok(tables
            .contacts
            .iter_mut()
            .find(|contact| contact.id == *id && contact.user_id == *owner)
            .map(|contact| {
                apply_contact(contact, draft);
                contact.clone()
            }))
    }

    async fn delete_contact(
        &self,
        owner: &UserId,
        id: &ContactMethodId,
    ) -> Result<bool, PortfolioRepositoryError> {
        let mut tables = self.tables()?;
        let before = tables.contacts.len();
        tables
            .contacts
            .retain(|contact| !(contact.id == *id && contact.user_id == *owner));
        Ok(tables.contacts.len() < before)
    }
}
