//! Post, feed, bookmark, and interaction handlers.
//!
//! ```text
//! GET    /api/v1/posts?view=top&username=ada&excludeReplies=true&cursor=...&limit=10
//! POST   /api/v1/posts {"text":"Hello","images":[],"replyPrivacy":"PUBLIC"}
//! GET    /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! GET    /api/v1/posts/{id}/replies?cursor=...
//! POST   /api/v1/posts/{id}/replies {"text":"Nice"}
//! POST   /api/v1/posts/{id}/like | bookmark | repost
//! GET    /api/v1/bookmarks?cursor=...
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, delete, get, post, web};
use pagination::{Page, PageRequest, next_page_link};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::InteractionResult;
use crate::domain::{
    FEED_DEFAULT_LIMIT, FEED_MAX_LIMIT, FeedRequest, FeedView, InteractionKind, NewPost,
    PostCounts, PostCursorKey, PostId, PostText, PostView, ReplyPrivacy, UserId,
    validate_post_images,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{
    ErrorSchema, PostCountsSchema, PostPageSchema, PostViewSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_id, post_validation_error,
};

/// Feed query string.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub view: Option<String>,
    pub username: Option<String>,
    pub exclude_replies: Option<bool>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

/// Cursor query string for reply and bookmark listings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

/// New post body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[schema(max_length = 1000, example = "Shipped the new portfolio today")]
    pub text: String,
    #[serde(default)]
    #[schema(max_items = 4)]
    pub images: Vec<String>,
    /// `PUBLIC` (default) or `FOLLOWERS_ONLY`.
    #[schema(example = "PUBLIC")]
    pub reply_privacy: Option<String>,
    /// Parent post when replying.
    pub parent_id: Option<String>,
}

/// Reply body; the parent comes from the path.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[schema(max_length = 1000)]
    pub text: String,
    #[serde(default)]
    #[schema(max_items = 4)]
    pub images: Vec<String>,
    pub reply_privacy: Option<String>,
}

/// Interaction toggle result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionResponse {
    /// Whether the interaction is now present.
    pub active: bool,
    #[schema(value_type = PostCountsSchema)]
    pub counts: PostCounts,
    /// Refreshed post, returned for likes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PostViewSchema>)]
    pub post: Option<PostView>,
}

impl From<InteractionResult> for InteractionResponse {
    fn from(result: InteractionResult) -> Self {
        Self {
            active: result.outcome.active,
            counts: result.outcome.counts,
            post: result.post,
        }
    }
}

fn parse_view(raw: Option<&str>) -> ApiResult<FeedView> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(FeedView::All),
        Some("following") => Ok(FeedView::Following),
        Some("top") => Ok(FeedView::Top),
        Some(other) => Err(invalid_value_error(
            FieldName::new("view"),
            "view must be one of all, following, top",
            other,
        )),
    }
}

fn parse_reply_privacy(raw: Option<&str>) -> ApiResult<ReplyPrivacy> {
    match raw {
        None => Ok(ReplyPrivacy::default()),
        Some(value) => ReplyPrivacy::parse(value).ok_or_else(|| {
            invalid_value_error(
                FieldName::new("replyPrivacy"),
                "replyPrivacy must be PUBLIC or FOLLOWERS_ONLY",
                value,
            )
        }),
    }
}

fn new_post(
    author_id: UserId,
    text: String,
    images: Vec<String>,
    reply_privacy: Option<&str>,
    parent_id: Option<PostId>,
) -> ApiResult<NewPost> {
    let text = PostText::new(text).map_err(|error| post_validation_error(&error))?;
    let images = validate_post_images(images).map_err(|error| post_validation_error(&error))?;
    Ok(NewPost {
        author_id,
        text,
        images,
        reply_privacy: parse_reply_privacy(reply_privacy)?,
        parent_id,
    })
}

fn post_id(raw: &str) -> ApiResult<PostId> {
    parse_id(raw, FieldName::new("id"), PostId::new)
}

/// Serialise a post page, adding `Link: <...>; rel="next"` when more follow.
///
/// The link repeats the request URL with `cursor` and the normalised `limit`
/// replaced, so other filters carry over.
fn page_response(
    mut response: HttpResponseBuilder,
    req: &HttpRequest,
    limit: Option<usize>,
    page: Page<PostView>,
) -> HttpResponse {
    if let Some(cursor) = page.next_cursor() {
        let limit =
            PageRequest::<PostCursorKey>::new(None, limit, FEED_DEFAULT_LIMIT, FEED_MAX_LIMIT)
                .limit();
        let next = next_page_link(&req.full_url(), cursor, limit);
        response.insert_header((header::LINK, format!("<{next}>; rel=\"next\"")));
    }
    response.json(page)
}

/// List posts for one of the feed views.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(
        ("view" = Option<String>, Query, description = "all (default), following, or top"),
        ("username" = Option<String>, Query, description = "Author filter, case-insensitive"),
        ("excludeReplies" = Option<bool>, Query, description = "Only top-level posts"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page"),
        ("limit" = Option<usize>, Query, description = "Page size, default 10, max 50")
    ),
    responses(
        (status = 200, description = "Feed page", body = PostPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Following view without a session", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "fetchPosts",
    security([], ("SessionCookie" = []))
)]
#[get("/posts")]
pub async fn fetch_posts(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FeedParams>,
) -> ApiResult<HttpResponse> {
    let params = query.into_inner();
    let limit = params.limit;
    let request = FeedRequest {
        view: parse_view(params.view.as_deref())?,
        viewer: session.user_id()?,
        username: params.username,
        exclude_replies: params.exclude_replies.unwrap_or(false),
        cursor: params.cursor,
        limit: params.limit,
    };
    let page = state.feed.fetch_posts(request).await?;
    Ok(page_response(HttpResponse::Ok(), &req, limit, page))
}

/// Publish a post or, with `parentId`, a reply.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created post", body = PostViewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Replies restricted to followers", body = ErrorSchema),
        (status = 404, description = "Parent not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let parent_id = body
        .parent_id
        .as_deref()
        .map(|raw| parse_id(raw, FieldName::new("parentId"), PostId::new))
        .transpose()?;
    let post = new_post(
        user_id,
        body.text,
        body.images,
        body.reply_privacy.as_deref(),
        parent_id,
    )?;
    let view = state.posts.create_post(post).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Reply to a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/replies",
    params(("id" = String, Path, description = "Parent post id")),
    request_body = ReplyRequest,
    responses(
        (status = 201, description = "Created reply", body = PostViewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Replies restricted to followers", body = ErrorSchema),
        (status = 404, description = "Parent not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "replyToPost"
)]
#[post("/posts/{id}/replies")]
pub async fn reply_to_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReplyRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let parent_id = post_id(&path)?;
    let body = payload.into_inner();
    let post = new_post(
        user_id,
        body.text,
        body.images,
        body.reply_privacy.as_deref(),
        Some(parent_id),
    )?;
    let view = state.posts.create_post(post).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostViewSchema),
        (status = 400, description = "Bad id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([], ("SessionCookie" = []))
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let id = post_id(&path)?;
    let viewer = session.user_id()?;
    Ok(web::Json(state.feed.get_post(&id, viewer).await?))
}

/// Delete an owned post and its replies.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = post_id(&path)?;
    state.posts.delete_post(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Direct replies to a post, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/replies",
    params(
        ("id" = String, Path, description = "Parent post id"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor"),
        ("limit" = Option<usize>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Reply page", body = PostPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Parent not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "fetchReplies",
    security([], ("SessionCookie" = []))
)]
#[get("/posts/{id}/replies")]
pub async fn fetch_replies(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let id = post_id(&path)?;
    let viewer = session.user_id()?;
    let PageParams { cursor, limit } = query.into_inner();
    let page = state.feed.fetch_replies(&id, viewer, cursor, limit).await?;
    Ok(page_response(HttpResponse::Ok(), &req, limit, page))
}

/// Posts bookmarked by the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/bookmarks",
    params(
        ("cursor" = Option<String>, Query, description = "Opaque cursor"),
        ("limit" = Option<usize>, Query, description = "Page size, default 10")
    ),
    responses(
        (status = 200, description = "Bookmarked posts", body = PostPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getBookmarks"
)]
#[get("/bookmarks")]
pub async fn get_bookmarks(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let PageParams { cursor, limit } = query.into_inner();
    let page = state.feed.bookmarks(&user_id, cursor, limit).await?;
    let mut response = HttpResponse::Ok();
    response.insert_header(private_no_cache_header());
    Ok(page_response(response, &req, limit, page))
}

async fn toggle(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    kind: InteractionKind,
) -> ApiResult<web::Json<InteractionResponse>> {
    let user_id = session.require_user_id()?;
    let id = post_id(raw_id)?;
    let result = state.posts.toggle_interaction(kind, &user_id, &id).await?;
    Ok(web::Json(result.into()))
}

/// Like or unlike a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like state and refreshed post", body = InteractionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "toggleLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InteractionResponse>> {
    toggle(&state, &session, &path, InteractionKind::Like).await
}

/// Bookmark or un-bookmark a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/bookmark",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Bookmark state", body = InteractionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "toggleBookmark"
)]
#[post("/posts/{id}/bookmark")]
pub async fn toggle_bookmark(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InteractionResponse>> {
    toggle(&state, &session, &path, InteractionKind::Bookmark).await
}

/// Repost or undo a repost.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/repost",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Repost state", body = InteractionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "toggleRepost"
)]
#[post("/posts/{id}/repost")]
pub async fn toggle_repost(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InteractionResponse>> {
    toggle(&state, &session, &path, InteractionKind::Repost).await
}
