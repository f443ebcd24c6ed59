//! Internal Diesel row structs and their conversions into domain types.
//!
//! Rows never leave the persistence layer. Conversions return `String`
//! errors so each repository can wrap them in its own query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ContactMethod, ContactMethodId, ContactType, Experience, ExperienceId, Month, PostCounts,
    PostId, PostRecord, Project, ProjectId, ReplyPrivacy, User, UserId, UserSummary, Username,
    Year,
};

use super::schema::{contact_methods, experiences, posts, projects, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub external_subject: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub verified: bool,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|err| format!("stored username for {} is invalid: {err}", row.id))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            external_subject: row.external_subject,
            email: row.email,
            username,
            full_name: row.full_name,
            first_name: row.first_name,
            last_name: row.last_name,
            job_title: row.job_title,
            website: row.website,
            location: row.location,
            description: row.description,
            profile_image: row.profile_image,
            verified: row.verified,
            onboarding_complete: row.onboarding_complete,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Author card columns joined onto posts and follow lists.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub verified: bool,
}

impl From<AuthorRow> for UserSummary {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            full_name: row.full_name,
            profile_image: row.profile_image,
            verified: row.verified,
            is_following: false,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub external_subject: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub profile_image: Option<&'a str>,
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub username: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub job_title: Option<&'a str>,
    pub website: Option<&'a str>,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub images: Vec<String>,
    pub reply_privacy: String,
    pub parent_id: Option<Uuid>,
    pub like_count: i64,
    pub reply_count: i64,
    pub repost_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    pub fn counts(&self) -> PostCounts {
        PostCounts {
            likes: counter(self.like_count),
            replies: counter(self.reply_count),
            reposts: counter(self.repost_count),
        }
    }
}

/// Post joined with its author card.
pub(crate) type PostWithAuthor = (PostRow, AuthorRow);

pub(crate) fn row_to_post((post, author): PostWithAuthor) -> Result<PostRecord, String> {
    let reply_privacy = ReplyPrivacy::parse(&post.reply_privacy).ok_or_else(|| {
        format!(
            "post {} has unknown reply privacy '{}'",
            post.id, post.reply_privacy
        )
    })?;
    let counts = post.counts();
    Ok(PostRecord {
        id: PostId::from_uuid(post.id),
        author: author.into(),
        text: post.text,
        images: post.images,
        reply_privacy,
        parent_id: post.parent_id.map(PostId::from_uuid),
        created_at: post.created_at,
        updated_at: post.updated_at,
        counts,
    })
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: &'a str,
    pub images: &'a [String],
    pub reply_privacy: &'static str,
    pub parent_id: Option<Uuid>,
}

/// Counters are constrained non-negative; anything else reads as zero.
pub(crate) fn counter(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

fn month(raw: &str, owner: Uuid) -> Result<Month, String> {
    Month::parse(raw).ok_or_else(|| format!("row {owner} has unknown month '{raw}'"))
}

fn year(raw: String, owner: Uuid) -> Result<Year, String> {
    Year::try_from(raw).map_err(|err| format!("row {owner} has invalid year: {err}"))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub client: Option<String>,
    pub start_month: String,
    pub start_year: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = String;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProjectId::from_uuid(row.id),
            author_id: UserId::from_uuid(row.author_id),
            title: row.title,
            description: row.description,
            url: row.url,
            client: row.client,
            start_month: month(&row.start_month, row.id)?,
            start_year: year(row.start_year, row.id)?,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Full project write; `None` clears optional columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProjectWrite<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub url: Option<&'a str>,
    pub client: Option<&'a str>,
    pub start_month: &'static str,
    pub start_year: String,
    pub images: &'a [String],
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = experiences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExperienceRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: Option<String>,
    pub start_month: String,
    pub start_year: String,
    pub end_month: Option<String>,
    pub end_year: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ExperienceRow> for Experience {
    type Error = String;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        let end_month = row
            .end_month
            .as_deref()
            .map(|raw| month(raw, row.id))
            .transpose()?;
        let end_year = row.end_year.map(|raw| year(raw, row.id)).transpose()?;
        Ok(Self {
            id: ExperienceId::from_uuid(row.id),
            author_id: UserId::from_uuid(row.author_id),
            title: row.title,
            company: row.company,
            description: row.description,
            url: row.url,
            start_month: month(&row.start_month, row.id)?,
            start_year: year(row.start_year, row.id)?,
            end_month,
            end_year,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = experiences)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ExperienceWrite<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub description: &'a str,
    pub url: Option<&'a str>,
    pub start_month: &'static str,
    pub start_year: String,
    pub end_month: Option<&'static str>,
    pub end_year: Option<String>,
    pub images: &'a [String],
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contact_methods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub contact_type: String,
    pub contact_username: String,
    pub url: String,
}

impl TryFrom<ContactRow> for ContactMethod {
    type Error = String;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let kind = ContactType::parse(&row.contact_type).ok_or_else(|| {
            format!(
                "contact method {} has unknown type '{}'",
                row.id, row.contact_type
            )
        })?;
        Ok(Self {
            id: ContactMethodId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            kind,
            contact_username: row.contact_username,
            url: row.url,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = contact_methods)]
pub(crate) struct ContactWrite<'a> {
    pub contact_type: &'static str,
    pub contact_username: &'a str,
    pub url: String,
}
