//! Crawler documents served from the site root.
//!
//! ```text
//! GET /sitemap.xml
//! GET /robots.txt
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::crawler_cache_header;
use crate::inbound::http::state::HttpState;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// XML sitemap of the site, profiles, and posts.
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses((status = 200, description = "Sitemap", content_type = "application/xml", body = String)),
    tags = ["crawlers"],
    operation_id = "sitemap",
    security([])
)]
#[get("/sitemap.xml")]
pub async fn sitemap(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let body = state.sitemap.sitemap_xml().await?;
    Ok(HttpResponse::Ok()
        .content_type(XML_CONTENT_TYPE)
        .insert_header(crawler_cache_header())
        .body(body))
}

/// Crawler directives pointing at the sitemap.
#[utoipa::path(
    get,
    path = "/robots.txt",
    responses((status = 200, description = "robots.txt", content_type = "text/plain", body = String)),
    tags = ["crawlers"],
    operation_id = "robots",
    security([])
)]
#[get("/robots.txt")]
pub async fn robots(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .insert_header(crawler_cache_header())
        .body(state.sitemap.robots_txt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    use crate::domain::Error;
    use crate::inbound::http::test_utils::MockPorts;

    async fn fetch(state: HttpState, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(sitemap)
                .service(robots),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn sitemap_is_served_as_xml() {
        let mut mocks = MockPorts::default();
        mocks
            .sitemap
            .expect_sitemap_xml()
            .return_once(|| Ok("<urlset></urlset>".to_owned()));

        let response = fetch(mocks.into(), "/sitemap.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("application/xml"));
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("public, max-age=3600")
        );
        assert_eq!(actix_test::read_body(response).await, "<urlset></urlset>");
    }

    #[rstest]
    #[actix_web::test]
    async fn sitemap_failures_use_the_error_envelope() {
        let mut mocks = MockPorts::default();
        mocks
            .sitemap
            .expect_sitemap_xml()
            .return_once(|| Err(Error::internal("render failed")));

        let response = fetch(mocks.into(), "/sitemap.xml").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[actix_web::test]
    async fn robots_is_plain_text() {
        let mut mocks = MockPorts::default();
        mocks
            .sitemap
            .expect_robots_txt()
            .return_const("User-agent: *\nAllow: /\n".to_owned());

        let response = fetch(mocks.into(), "/robots.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(
            actix_test::read_body(response).await,
            "User-agent: *\nAllow: /\n"
        );
    }
}
