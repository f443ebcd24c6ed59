//! Translation of driven-port failures into domain errors.
//!
//! Connection and contention failures become `service_unavailable` so
//! clients may retry; query failures become `internal_error`, whose message
//! the HTTP adapter redacts.

use pagination::{Cursor, CursorError};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::Error;
use super::ports::{
    FeedCacheError, FollowRepositoryError, PortfolioRepositoryError, PostRepositoryError,
    SearchRepositoryError, SitemapRepositoryError, UserRepositoryError,
};

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } | UserRepositoryError::Contention { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Duplicate { constraint } => {
            Error::conflict(format!("user already exists ({constraint})"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Connection { message }
        | FollowRepositoryError::Contention { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowRepositoryError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
    }
}

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } | PostRepositoryError::Contention { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

pub(crate) fn map_portfolio_error(error: PortfolioRepositoryError) -> Error {
    match error {
        PortfolioRepositoryError::Connection { message }
        | PortfolioRepositoryError::Contention { message } => {
            Error::service_unavailable(format!("portfolio repository unavailable: {message}"))
        }
        PortfolioRepositoryError::Query { message } => {
            Error::internal(format!("portfolio repository error: {message}"))
        }
    }
}

pub(crate) fn map_search_error(error: SearchRepositoryError) -> Error {
    match error {
        SearchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("search repository unavailable: {message}"))
        }
        SearchRepositoryError::Query { message } => {
            Error::internal(format!("search repository error: {message}"))
        }
    }
}

pub(crate) fn map_sitemap_error(error: SitemapRepositoryError) -> Error {
    match error {
        SitemapRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sitemap repository unavailable: {message}"))
        }
        SitemapRepositoryError::Query { message } => {
            Error::internal(format!("sitemap repository error: {message}"))
        }
    }
}

/// Decode an optional client cursor, rejecting malformed tokens.
pub(crate) fn decode_cursor<K: DeserializeOwned>(
    raw: Option<&str>,
) -> Result<Option<Cursor<K>>, Error> {
    raw.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Cursor::decode)
        .transpose()
        .map_err(|error| {
            Error::invalid_request("invalid cursor").with_details(json!({
                "field": "cursor",
                "code": "invalid_cursor",
                "reason": error.to_string(),
            }))
        })
}

/// Encoding a key we built ourselves only fails on a serializer bug.
pub(crate) fn map_page_error(error: CursorError) -> Error {
    Error::internal(format!("failed to encode page cursor: {error}"))
}

pub(crate) fn log_cache_error(operation: &'static str, error: &FeedCacheError) {
    tracing::warn!(operation, error = %error, "feed cache unavailable; bypassing");
}
