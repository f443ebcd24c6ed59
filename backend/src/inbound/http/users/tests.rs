//! Profile and follow handler coverage.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::web;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Error, UserProfile};
use crate::inbound::http::test_utils::{
    MockPorts, login_request, session_cookie, test_app, user_named,
};

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_user_profile)
        .service(update_profile)
        .service(update_profile_image)
        .service(batch_follow_status)
        .service(toggle_follow)
        .service(get_follows)
        .service(get_user_profile);
}

fn profile_of(user: User) -> UserProfile {
    UserProfile {
        user,
        contacts: Vec::new(),
        projects: Vec::new(),
        experiences: Vec::new(),
        counts: ProfileCounts {
            followers: 2,
            following: 1,
            posts: 5,
        },
        is_following: None,
    }
}

async fn signed_in(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    user: &UserId,
) -> actix_web::cookie::Cookie<'static> {
    let response = actix_test::call_service(app, login_request(user).to_request()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    session_cookie(&response)
}

fn detail(body: &Value, key: &str) -> Option<Value> {
    body.get("details").and_then(|details| details.get(key)).cloned()
}

#[rstest]
#[actix_web::test]
async fn own_profile_requires_a_session() {
    let app = actix_test::init_service(test_app(MockPorts::default().into(), configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn own_profile_is_loaded_for_the_session_user() {
    let ada = user_named("ada");
    let ada_id = ada.id;
    let mut mocks = MockPorts::default();
    mocks
        .profile_query
        .expect_profile_by_id()
        .withf(move |id, viewer| *id == ada_id && *viewer == Some(ada_id))
        .return_once(move |_, _| Ok(profile_of(ada)));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &ada_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("username"), Some(&Value::from("ada")));
    assert_eq!(body.pointer("/counts/posts"), Some(&Value::from(5)));
    assert!(body.get("isFollowing").is_none());
}

#[rstest]
#[actix_web::test]
async fn anonymous_profile_lookup_passes_no_viewer() {
    let grace = user_named("grace");
    let mut mocks = MockPorts::default();
    mocks
        .profile_query
        .expect_profile()
        .withf(|name: &str, viewer| name == "Grace" && viewer.is_none())
        .return_once(move |_, _| Ok(profile_of(grace)));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/Grace")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("fullName"), Some(&Value::from("grace")));
}

#[rstest]
#[actix_web::test]
async fn unknown_profiles_are_not_found() {
    let mut mocks = MockPorts::default();
    mocks
        .profile_query
        .expect_profile()
        .return_once(|_, _| Err(Error::not_found("user not found")));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/nobody")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!({"username": "ab"}), "username", "too_short")]
#[case(json!({"username": "no spaces"}), "username", "invalid_characters")]
#[case(json!({"fullName": "   "}), "fullName", "missing_field")]
#[case(json!({"website": "ftp://ada.dev"}), "website", "invalid_url")]
#[case(json!({"description": "x".repeat(501)}), "description", "too_long")]
#[actix_web::test]
async fn invalid_profile_edits_are_rejected(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let user_id = UserId::random();
    let app = actix_test::init_service(test_app(MockPorts::default().into(), configure)).await;
    let cookie = signed_in(&app, &user_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code"), Some(&Value::from("invalid_request")));
    assert_eq!(detail(&body, "field"), Some(Value::from(field)));
    assert_eq!(detail(&body, "code"), Some(Value::from(code)));
}

#[rstest]
#[actix_web::test]
async fn profile_edits_are_normalised_before_reaching_the_service() {
    let ada = user_named("ada");
    let ada_id = ada.id;
    let mut mocks = MockPorts::default();
    mocks
        .profile
        .expect_update_profile()
        .withf(move |id, update| {
            *id == ada_id
                && update.username.as_ref().map(AsRef::as_ref) == Some("ada_l")
                && update.website.as_deref() == Some("https://ada.dev")
                && update.location.as_deref() == Some("London")
        })
        .return_once(move |_, _| Ok(ada));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &ada_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(json!({
                "username": "Ada_L",
                "website": "https://ada.dev",
                "location": "  London "
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn taken_usernames_conflict() {
    let user_id = UserId::random();
    let mut mocks = MockPorts::default();
    mocks
        .profile
        .expect_update_profile()
        .return_once(|_, _| Err(Error::conflict("That username is taken. Please try another.")));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &user_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .set_json(json!({"username": "grace"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn image_updates_forward_the_url() {
    let ada = User {
        profile_image: Some("https://img.example/ada.png".to_owned()),
        ..user_named("ada")
    };
    let ada_id = ada.id;
    let mut mocks = MockPorts::default();
    mocks
        .profile
        .expect_update_image()
        .withf(|_, url: &String| url == "https://img.example/ada.png")
        .return_once(move |_, _| Ok(ada));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &ada_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/me/image")
            .cookie(cookie)
            .set_json(json!({"imageUrl": "https://img.example/ada.png"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("profileImage"),
        Some(&Value::from("https://img.example/ada.png"))
    );
}

#[rstest]
#[actix_web::test]
async fn follow_targets_must_be_uuids() {
    let user_id = UserId::random();
    let app = actix_test::init_service(test_app(MockPorts::default().into(), configure)).await;
    let cookie = signed_in(&app, &user_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/not-a-uuid/follow")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail(&body, "code"), Some(Value::from("invalid_uuid")));
    assert_eq!(detail(&body, "value"), Some(Value::from("not-a-uuid")));
}

#[rstest]
#[actix_web::test]
async fn follow_toggle_reports_the_new_state() {
    let user_id = UserId::random();
    let target = UserId::random();
    let mut mocks = MockPorts::default();
    mocks
        .profile
        .expect_toggle_follow()
        .withf(move |follower, followee| *follower == user_id && *followee == target)
        .return_once(|_, _| Ok(true));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &user_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{target}/follow"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"following": true}));
}

#[rstest]
#[actix_web::test]
async fn follow_lists_are_public() {
    let ada = user_named("ada");
    let grace = user_named("grace");
    let target = ada.id;
    let mut mocks = MockPorts::default();
    mocks
        .profile_query
        .expect_follow_lists()
        .withf(move |id| *id == target)
        .return_once(move |_| {
            Ok(FollowLists {
                followers: vec![grace.summary()],
                following: Vec::new(),
            })
        });
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{target}/follows"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/followers/0/username"),
        Some(&Value::from("grace"))
    );
}

#[rstest]
#[actix_web::test]
async fn follow_status_returns_a_map_keyed_by_id() {
    let viewer = UserId::random();
    let followed = UserId::random();
    let stranger = UserId::random();
    let mut mocks = MockPorts::default();
    mocks
        .profile_query
        .expect_follow_status()
        .withf(move |who, ids| *who == Some(viewer) && ids.len() == 2)
        .return_once(move |_, _| Ok(HashMap::from([(followed, true), (stranger, false)])));
    let app = actix_test::init_service(test_app(mocks.into(), configure)).await;
    let cookie = signed_in(&app, &viewer).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/follow-status")
            .cookie(cookie)
            .set_json(json!({"userIds": [followed.to_string(), stranger.to_string()]}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get(followed.to_string()), Some(&Value::Bool(true)));
    assert_eq!(body.get(stranger.to_string()), Some(&Value::Bool(false)));
}

#[rstest]
#[actix_web::test]
async fn follow_status_rejects_malformed_ids() {
    let app = actix_test::init_service(test_app(MockPorts::default().into(), configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/follow-status")
            .set_json(json!({"userIds": ["nope"]}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail(&body, "index"), Some(Value::from(0)));
}
