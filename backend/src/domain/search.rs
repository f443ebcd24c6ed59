//! Cross-category search over users, posts, projects, and experiences.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Experience, PostCounts, PostId, PostRecord, Project, UserId, UserSummary};

/// Longest term passed to the database; longer input is truncated.
pub const SEARCH_TERM_MAX: usize = 50;
/// Page size for each search category.
pub const SEARCH_PAGE_SIZE: usize = 20;

/// Which categories a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    /// Every category.
    #[default]
    All,
    /// Users only.
    Users,
    /// Top-level posts only.
    Posts,
    /// Projects only.
    Projects,
    /// Experiences only.
    Experiences,
}

impl SearchFilter {
    /// Whether `category` is selected by this filter.
    pub fn includes(self, category: Self) -> bool {
        self == Self::All || self == category
    }
}

/// Normalised search term.
///
/// ## Invariants
/// - Non-empty after trimming.
/// - At most [`SEARCH_TERM_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim and truncate raw input. Returns `None` when nothing remains.
    ///
    /// # Examples
    /// ```
    /// use whoami::domain::SearchTerm;
    ///
    /// assert!(SearchTerm::parse("   ").is_none());
    /// let term = SearchTerm::parse(" rust ").expect("term");
    /// assert_eq!(term.as_ref(), "rust");
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.chars().take(SEARCH_TERM_MAX).collect()))
    }

    /// `ILIKE` pattern matching the term as a substring.
    ///
    /// `%`, `_`, and `\` are escaped so user input never acts as a wildcard.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive substring test used by in-process adapters.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Sort key shared by every search category: newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchKey {
    /// Creation time of the boundary row.
    pub created_at: DateTime<Utc>,
    /// Identifier tiebreak.
    pub id: Uuid,
}

/// Per-category cursors supplied by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCursors {
    /// Users cursor.
    pub users: Option<String>,
    /// Posts cursor.
    pub posts: Option<String>,
    /// Projects cursor.
    pub projects: Option<String>,
    /// Experiences cursor.
    pub experiences: Option<String>,
}

/// Search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text.
    pub query: String,
    /// Selected categories.
    pub filter: SearchFilter,
    /// Cursors for each category.
    pub cursors: SearchCursors,
}

/// Post hit returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostHit {
    /// Identifier.
    pub id: PostId,
    /// Author card.
    pub author: UserSummary,
    /// Body text.
    pub text: String,
    /// Image URLs.
    pub images: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Counters.
    pub counts: PostCounts,
}

impl From<PostRecord> for PostHit {
    fn from(value: PostRecord) -> Self {
        Self {
            id: value.id,
            author: value.author,
            text: value.text,
            images: value.images,
            created_at: value.created_at,
            counts: value.counts,
        }
    }
}

/// Search results, one page per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Matching users.
    pub users: Page<UserSummary>,
    /// Matching top-level posts.
    pub posts: Page<PostHit>,
    /// Matching projects.
    pub projects: Page<Project>,
    /// Matching experiences.
    pub experiences: Page<Experience>,
}

/// Key helper for users, whose summary does not carry a timestamp.
pub fn user_key(id: UserId, created_at: DateTime<Utc>) -> SearchKey {
    SearchKey {
        created_at,
        id: *id.as_uuid(),
    }
}
