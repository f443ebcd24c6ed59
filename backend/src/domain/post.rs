//! Posts, replies, and the feed read model.
//!
//! A post is either top-level (`parent_id == None`) or a reply. The feed read
//! model ([`PostView`]) decorates the stored [`PostRecord`] with viewer
//! relative state: whether the viewer follows the author, has liked,
//! bookmarked, or reposted the post, plus a handful of reply previews.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::web_url::{HTTP_SCHEMES, parse_web_url};
use super::{UserId, UserSummary};

/// Maximum post length in characters.
pub const POST_TEXT_MAX: usize = 1000;
/// Maximum number of images attached to one post.
pub const MAX_POST_IMAGES: usize = 4;
/// Number of newest replies embedded in each feed item.
pub const REPLY_PREVIEW_COUNT: usize = 3;

/// Validation failures for post input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The identifier was not a UUID.
    #[error("post id must be a valid UUID")]
    InvalidId,
    /// The text was blank.
    #[error("post text must not be empty")]
    EmptyText,
    /// The text exceeded [`POST_TEXT_MAX`].
    #[error("post text must be at most {max} characters")]
    TextTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// More than [`MAX_POST_IMAGES`] images.
    #[error("a post may include at most {max} images")]
    TooManyImages {
        /// Maximum accepted count.
        max: usize,
    },
    /// An image was not an absolute http(s) URL.
    #[error("image {index} must be an absolute http(s) URL")]
    InvalidImage {
        /// Position of the rejected image.
        index: usize,
    },
}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Parse a post identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostText(String);

impl PostText {
    /// Trim and validate post text.
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        if trimmed.chars().count() > POST_TEXT_MAX {
            return Err(PostValidationError::TextTooLong { max: POST_TEXT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validate the image list attached to a post.
pub fn validate_post_images(images: Vec<String>) -> Result<Vec<String>, PostValidationError> {
    if images.len() > MAX_POST_IMAGES {
        return Err(PostValidationError::TooManyImages {
            max: MAX_POST_IMAGES,
        });
    }
    images
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parse_web_url(raw, HTTP_SCHEMES).map_err(|_| PostValidationError::InvalidImage { index })
        })
        .collect()
}

/// Who may reply to a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyPrivacy {
    /// Anyone signed in.
    #[default]
    Public,
    /// The author and the author's followers.
    FollowersOnly,
}

impl ReplyPrivacy {
    /// Database spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::FollowersOnly => "FOLLOWERS_ONLY",
        }
    }

    /// Parse the database spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PUBLIC" => Some(Self::Public),
            "FOLLOWERS_ONLY" => Some(Self::FollowersOnly),
            _ => None,
        }
    }
}

/// Feed flavour requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedView {
    /// Every top-level post, newest first.
    #[default]
    All,
    /// Posts by authors the viewer follows.
    Following,
    /// Most-liked first.
    Top,
}

impl FeedView {
    /// Query-string spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Following => "following",
            Self::Top => "top",
        }
    }
}

/// Denormalised interaction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCounts {
    /// Number of likes.
    pub likes: u64,
    /// Number of direct replies.
    pub replies: u64,
    /// Number of reposts.
    pub reposts: u64,
}

/// Interaction state of the current viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerFlags {
    /// The viewer liked the post.
    pub is_liked: bool,
    /// The viewer bookmarked the post.
    pub is_bookmarked: bool,
    /// The viewer reposted the post.
    pub is_reposted: bool,
}

/// Post as stored, joined with its author and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Identifier.
    pub id: PostId,
    /// Author card; `is_following` is filled in by the service.
    pub author: UserSummary,
    /// Body text.
    pub text: String,
    /// Attached image URLs.
    pub images: Vec<String>,
    /// Reply policy.
    pub reply_privacy: ReplyPrivacy,
    /// Parent post for replies.
    pub parent_id: Option<PostId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Interaction counters.
    pub counts: PostCounts,
}

impl PostRecord {
    /// Keyset position of this row within `view`.
    pub fn cursor_key(&self, view: FeedView) -> PostCursorKey {
        PostCursorKey {
            like_count: matches!(view, FeedView::Top).then_some(self.counts.likes),
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Sort key encoded in post cursors.
///
/// `like_count` is present only for the `top` view, which orders by likes
/// before recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCursorKey {
    /// Like count of the boundary row (top view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    /// Creation time of the boundary row.
    pub created_at: DateTime<Utc>,
    /// Identifier tiebreak.
    pub id: PostId,
}

/// Reply embedded in a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPreview {
    /// Identifier.
    pub id: PostId,
    /// Author card.
    pub author: UserSummary,
    /// Body text.
    pub text: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<PostRecord> for ReplyPreview {
    fn from(value: PostRecord) -> Self {
        Self {
            id: value.id,
            author: value.author,
            text: value.text,
            created_at: value.created_at,
        }
    }
}

/// Feed item returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Identifier.
    pub id: PostId,
    /// Author card with viewer-relative `is_following`.
    pub author: UserSummary,
    /// Body text.
    pub text: String,
    /// Attached image URLs.
    pub images: Vec<String>,
    /// Reply policy.
    pub reply_privacy: ReplyPrivacy,
    /// Parent post for replies.
    pub parent_id: Option<PostId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Interaction counters.
    pub counts: PostCounts,
    /// Viewer interaction state.
    pub viewer: ViewerFlags,
    /// Newest replies, at most [`REPLY_PREVIEW_COUNT`].
    pub replies: Vec<ReplyPreview>,
    /// Feed flavour this item was rendered for.
    pub view: FeedView,
}

impl PostView {
    /// Decorate a record with viewer state.
    pub fn assemble(
        record: PostRecord,
        viewer: ViewerFlags,
        replies: Vec<ReplyPreview>,
        view: FeedView,
    ) -> Self {
        Self {
            id: record.id,
            author: record.author,
            text: record.text,
            images: record.images,
            reply_privacy: record.reply_privacy,
            parent_id: record.parent_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            counts: record.counts,
            viewer,
            replies,
            view,
        }
    }
}

/// Validated post ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Author.
    pub author_id: UserId,
    /// Body text.
    pub text: PostText,
    /// Image URLs.
    pub images: Vec<String>,
    /// Reply policy.
    pub reply_privacy: ReplyPrivacy,
    /// Parent post when replying.
    pub parent_id: Option<PostId>,
}

/// Repository-level feed filter derived from a [`FeedRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFilter {
    /// Ordering and author scope.
    pub view: FeedView,
    /// Viewer, required for [`FeedView::Following`].
    pub viewer: Option<UserId>,
    /// Lowercased author username.
    pub author: Option<String>,
    /// Restrict to posts without a parent.
    pub top_level_only: bool,
}

/// Feed page request as received from clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRequest {
    /// Feed flavour.
    pub view: FeedView,
    /// Signed-in viewer.
    pub viewer: Option<UserId>,
    /// Author username filter.
    pub username: Option<String>,
    /// Drop replies even for non-`all` views.
    pub exclude_replies: bool,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
    /// Requested page size.
    pub limit: Option<usize>,
}

impl FeedRequest {
    /// Repository filter for this request.
    ///
    /// The `all` view and `exclude_replies` both restrict results to
    /// top-level posts.
    pub fn filter(&self) -> FeedFilter {
        FeedFilter {
            view: self.view,
            viewer: self.viewer,
            author: self
                .username
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_ascii_lowercase),
            top_level_only: matches!(self.view, FeedView::All) || self.exclude_replies,
        }
    }
}

/// Kinds of per-user post interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Heart.
    Like,
    /// Saved for later.
    Bookmark,
    /// Shared to followers.
    Repost,
}

/// Authoritative state after an interaction toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    /// Whether the interaction is now present.
    pub active: bool,
    /// Counters after the toggle.
    pub counts: PostCounts,
}

#[cfg(test)]
mod tests {
    //! Validation and read-model coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn post_text_is_trimmed() {
        let text = PostText::new("  hello  ").expect("valid text");
        assert_eq!(text.as_ref(), "hello");
    }

    #[rstest]
    #[case("", PostValidationError::EmptyText)]
    #[case("   \n", PostValidationError::EmptyText)]
    fn blank_text_is_rejected(#[case] raw: &str, #[case] expected: PostValidationError) {
        assert_eq!(PostText::new(raw), Err(expected));
    }

    #[rstest]
    fn text_limit_counts_characters_not_bytes() {
        let at_limit = "é".repeat(POST_TEXT_MAX);
        assert!(PostText::new(at_limit).is_ok());
        let over = "é".repeat(POST_TEXT_MAX + 1);
        assert_eq!(
            PostText::new(over),
            Err(PostValidationError::TextTooLong { max: POST_TEXT_MAX })
        );
    }

    #[rstest]
    fn images_are_limited_and_validated() {
        let five = vec!["https://img.example/a.png".to_owned(); 5];
        assert_eq!(
            validate_post_images(five),
            Err(PostValidationError::TooManyImages {
                max: MAX_POST_IMAGES
            })
        );
        let bad = vec![
            "https://img.example/a.png".to_owned(),
            "not a url".to_owned(),
        ];
        assert_eq!(
            validate_post_images(bad),
            Err(PostValidationError::InvalidImage { index: 1 })
        );
    }

    #[rstest]
    #[case(FeedView::All, false, true)]
    #[case(FeedView::Top, false, false)]
    #[case(FeedView::Top, true, true)]
    #[case(FeedView::Following, false, false)]
    fn feed_filter_top_level_rule(
        #[case] view: FeedView,
        #[case] exclude_replies: bool,
        #[case] expected: bool,
    ) {
        let request = FeedRequest {
            view,
            exclude_replies,
            ..FeedRequest::default()
        };
        assert_eq!(request.filter().top_level_only, expected);
    }

    #[rstest]
    fn feed_filter_normalises_username() {
        let request = FeedRequest {
            username: Some(" Ada ".to_owned()),
            ..FeedRequest::default()
        };
        assert_eq!(request.filter().author.as_deref(), Some("ada"));
    }

    #[rstest]
    fn reply_privacy_round_trips_database_spelling() {
        for privacy in [ReplyPrivacy::Public, ReplyPrivacy::FollowersOnly] {
            assert_eq!(ReplyPrivacy::parse(privacy.as_str()), Some(privacy));
        }
        assert_eq!(ReplyPrivacy::parse("friends"), None);
    }
}
