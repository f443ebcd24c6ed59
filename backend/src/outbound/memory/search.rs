//! Substring search and sitemap listings.

use async_trait::async_trait;

use crate::domain::ports::{
    SearchRepository, SearchRepositoryError, SitemapRepository, SitemapRepositoryError,
};
use crate::domain::{Experience, PostRecord, Project, SearchKey, SearchTerm, SitemapPost, User};

use super::InMemoryStore;

/// Newest-first keyset page over rows carrying a [`SearchKey`].
fn newest_after<T>(
    rows: impl Iterator<Item = (SearchKey, T)>,
    after: Option<SearchKey>,
    fetch_limit: usize,
) -> Vec<T> {
    let mut rows: Vec<(SearchKey, T)> = rows
        .filter(|(key, _)| after.is_none_or(|boundary| *key < boundary))
        .collect();
    rows.sort_by(|(a, _), (b, _)| b.cmp(a));
    rows.into_iter()
        .take(fetch_limit)
        .map(|(_, row)| row)
        .collect()
}

fn any_matches<'a>(term: &SearchTerm, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    fields.into_iter().flatten().any(|field| term.matches(field))
}

#[async_trait]
impl SearchRepository for InMemoryStore {
    async fn users(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<User>, SearchRepositoryError> {
        let tables = self.tables()?;
        let hits = tables
            .users
            .values()
            .filter(|user| {
                any_matches(
                    term,
                    [
                        Some(user.username.as_ref()),
                        user.full_name.as_deref(),
                        user.description.as_deref(),
                    ],
                )
            })
            .map(|user| {
                let key = SearchKey {
                    created_at: user.created_at,
                    id: *user.id.as_uuid(),
                };
                (key, user.clone())
            });
        Ok(newest_after(hits, after, fetch_limit))
    }

    async fn posts(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, SearchRepositoryError> {
        let tables = self.tables()?;
        let hits = tables
            .posts
            .values()
            .filter(|post| post.parent_id.is_none() && term.matches(&post.text))
            .filter_map(|post| {
                let key = SearchKey {
                    created_at: post.created_at,
                    id: *post.id.as_uuid(),
                };
                tables.record(post).map(|record| (key, record))
            });
        Ok(newest_after(hits, after, fetch_limit))
    }

    async fn projects(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Project>, SearchRepositoryError> {
        let tables = self.tables()?;
        let hits = tables
            .projects
            .values()
            .filter(|project| {
                any_matches(
                    term,
                    [
                        Some(project.title.as_str()),
                        project.description.as_deref(),
                        project.client.as_deref(),
                    ],
                )
            })
            .map(|project| {
                let key = SearchKey {
                    created_at: project.created_at,
                    id: *project.id.as_uuid(),
                };
                (key, project.clone())
            });
        Ok(newest_after(hits, after, fetch_limit))
    }

    async fn experiences(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Experience>, SearchRepositoryError> {
        let tables = self.tables()?;
        let hits = tables
            .experiences
            .values()
            .filter(|experience| {
                any_matches(
                    term,
                    [
                        Some(experience.title.as_str()),
                        Some(experience.company.as_str()),
                        Some(experience.description.as_str()),
                    ],
                )
            })
            .map(|experience| {
                let key = SearchKey {
                    created_at: experience.created_at,
                    id: *experience.id.as_uuid(),
                };
                (key, experience.clone())
            });
        Ok(newest_after(hits, after, fetch_limit))
    }
}

#[async_trait]
impl SitemapRepository for InMemoryStore {
    async fn usernames(&self) -> Result<Vec<String>, SitemapRepositoryError> {
        let tables = self.tables()?;
        let mut names: Vec<String> = tables
            .users
            .values()
            .map(|user| user.username.as_ref().to_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn posts(&self) -> Result<Vec<SitemapPost>, SitemapRepositoryError> {
        let tables = self.tables()?;
        let mut posts: Vec<_> = tables.posts.values().collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(posts
            .into_iter()
            .filter_map(|post| {
                tables.users.get(&post.author_id).map(|author| SitemapPost {
                    username: author.username.as_ref().to_owned(),
                    id: post.id,
                    updated_at: post.updated_at,
                })
            })
            .collect())
    }
}
