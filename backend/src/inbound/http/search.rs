//! Cross-category search handler.
//!
//! ```text
//! GET /api/v1/search?q=rust&filter=posts&postsCursor=...
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{SearchCursors, SearchFilter, SearchRequest, SearchResults};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SearchResultsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Search query string.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub filter: Option<String>,
    pub users_cursor: Option<String>,
    pub posts_cursor: Option<String>,
    pub projects_cursor: Option<String>,
    pub experiences_cursor: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> ApiResult<SearchFilter> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(SearchFilter::All),
        Some("users") => Ok(SearchFilter::Users),
        Some("posts") => Ok(SearchFilter::Posts),
        Some("projects") => Ok(SearchFilter::Projects),
        Some("experiences") => Ok(SearchFilter::Experiences),
        Some(other) => Err(invalid_value_error(
            FieldName::new("filter"),
            "filter must be one of all, users, posts, projects, experiences",
            other,
        )),
    }
}

impl SearchParams {
    fn into_request(self) -> ApiResult<SearchRequest> {
        Ok(SearchRequest {
            filter: parse_filter(self.filter.as_deref())?,
            query: self.q,
            cursors: SearchCursors {
                users: self.users_cursor,
                posts: self.posts_cursor,
                projects: self.projects_cursor,
                experiences: self.experiences_cursor,
            },
        })
    }
}

/// Search users, posts, projects, and experiences.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(
        ("q" = Option<String>, Query, description = "Search text; blank returns nothing"),
        ("filter" = Option<String>, Query,
            description = "all (default), users, posts, projects, or experiences"),
        ("usersCursor" = Option<String>, Query, description = "Cursor for users"),
        ("postsCursor" = Option<String>, Query, description = "Cursor for posts"),
        ("projectsCursor" = Option<String>, Query, description = "Cursor for projects"),
        ("experiencesCursor" = Option<String>, Query, description = "Cursor for experiences")
    ),
    responses(
        (status = 200, description = "One page per category", body = SearchResultsSchema),
        (status = 400, description = "Invalid filter or cursor", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchAll",
    security([], ("SessionCookie" = []))
)]
#[get("/search")]
pub async fn search_all(
    state: web::Data<HttpState>,
    query: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResults>> {
    let request = query.into_inner().into_request()?;
    Ok(web::Json(state.search.search(request).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use pagination::Page;
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{MockPorts, test_app, user_named};

    #[rstest]
    #[case(None, SearchFilter::All)]
    #[case(Some("users"), SearchFilter::Users)]
    #[case(Some(" experiences "), SearchFilter::Experiences)]
    fn filters_parse(#[case] raw: Option<&str>, #[case] expected: SearchFilter) {
        assert_eq!(parse_filter(raw).expect("valid filter"), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn search_forwards_term_filter_and_cursors() {
        let ada = user_named("ada");
        let mut mocks = MockPorts::default();
        mocks
            .search
            .expect_search()
            .withf(|request| {
                request.query == "rust"
                    && request.filter == SearchFilter::Users
                    && request.cursors.users.as_deref() == Some("u1")
                    && request.cursors.posts.is_none()
            })
            .return_once(move |_| {
                Ok(SearchResults {
                    users: Page::from_parts(vec![ada.summary()], None),
                    ..SearchResults::default()
                })
            });
        let app = actix_test::init_service(test_app(mocks.into(), |cfg| {
            cfg.service(search_all);
        }))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/search?q=rust&filter=users&usersCursor=u1")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/users/data/0/username"),
            Some(&Value::from("ada"))
        );
        assert_eq!(body.pointer("/posts/data"), Some(&Value::Array(Vec::new())));
        assert_eq!(body.pointer("/projects/nextCursor"), Some(&Value::Null));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_filters_are_rejected() {
        let app = actix_test::init_service(test_app(MockPorts::default().into(), |cfg| {
            cfg.service(search_all);
        }))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/search?q=rust&filter=places")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.pointer("/details/field"), Some(&Value::from("filter")));
    }
}
