//! Behaviour tests for posting, interactions, and feed views against a live
//! server backed by the in-memory store.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared harness has helpers used by other integration suites.
#[allow(dead_code)]
#[path = "support/harness.rs"]
mod harness;

use harness::{
    RequestSpec, WorldFixture, last_json, latest_post, onboard, perform, user_id,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

fn publish(world: &WorldFixture, member: Option<&str>, text: &str) {
    let world = world.world();
    let spec = RequestSpec::post("/api/v1/posts", json!({ "text": text }));
    let spec = match member {
        Some(name) => spec.as_member(name),
        None => spec,
    };
    perform(&world, spec);
    if let Some(id) = last_json(&world, "/id").as_str() {
        world.borrow_mut().latest_post = Some(id.to_owned());
    }
}

fn load_latest_post(world: &WorldFixture) {
    let world = world.world();
    let id = latest_post(&world);
    perform(&world, RequestSpec::get(format!("/api/v1/posts/{id}")));
    assert_eq!(world.borrow().last.status, Some(200));
}

fn entry_count(world: &WorldFixture) -> usize {
    last_json(&world.world(), "/data")
        .as_array()
        .map(Vec::len)
        .expect("feed data array")
}

#[given("a running server with in-memory storage")]
fn a_running_server_with_in_memory_storage(world: &WorldFixture) {
    let _ = world;
}

#[given("{name} has an onboarded account")]
fn has_an_onboarded_account(world: &WorldFixture, name: String) {
    onboard(&world.world(), &name);
}

#[given("{name} has published a post saying {text}")]
fn has_published_a_post(world: &WorldFixture, name: String, text: String) {
    publish(world, Some(&name), &text);
    assert_eq!(world.world().borrow().last.status, Some(201));
}

#[when("{name} publishes a post saying {text}")]
fn publishes_a_post(world: &WorldFixture, name: String, text: String) {
    publish(world, Some(&name), &text);
}

#[when("an anonymous post saying {text} is submitted")]
fn an_anonymous_post_is_submitted(world: &WorldFixture, text: String) {
    publish(world, None, &text);
}

#[when("{name} likes the latest post")]
fn likes_the_latest_post(world: &WorldFixture, name: String) {
    let world = world.world();
    let id = latest_post(&world);
    perform(
        &world,
        RequestSpec::post(format!("/api/v1/posts/{id}/like"), Value::Null).as_member(&name),
    );
    assert_eq!(world.borrow().last.status, Some(200));
}

#[when("{name} bookmarks the latest post")]
fn bookmarks_the_latest_post(world: &WorldFixture, name: String) {
    let world = world.world();
    let id = latest_post(&world);
    perform(
        &world,
        RequestSpec::post(format!("/api/v1/posts/{id}/bookmark"), Value::Null).as_member(&name),
    );
    assert_eq!(world.borrow().last.status, Some(200));
}

#[when("{name} replies to the latest post saying {text}")]
fn replies_to_the_latest_post(world: &WorldFixture, name: String, text: String) {
    let world = world.world();
    let id = latest_post(&world);
    perform(
        &world,
        RequestSpec::post(format!("/api/v1/posts/{id}/replies"), json!({ "text": text }))
            .as_member(&name),
    );
}

#[when("{name} deletes the latest post")]
fn deletes_the_latest_post(world: &WorldFixture, name: String) {
    let world = world.world();
    let id = latest_post(&world);
    perform(
        &world,
        RequestSpec::delete(format!("/api/v1/posts/{id}")).as_member(&name),
    );
}

#[when("{name} follows {target}")]
fn follows(world: &WorldFixture, name: String, target: String) {
    let world = world.world();
    let target_id = user_id(&world, &target);
    perform(
        &world,
        RequestSpec::post(format!("/api/v1/users/{target_id}/follow"), Value::Null)
            .as_member(&name),
    );
    assert_eq!(last_json(&world, "/following"), Value::Bool(true));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(world.world().borrow().last.status, Some(status));
}

#[then("the public feed has {count} entries")]
fn the_public_feed_has_entries(world: &WorldFixture, count: usize) {
    perform(&world.world(), RequestSpec::get("/api/v1/posts?view=all"));
    assert_eq!(entry_count(world), count);
}

#[then("{name} sees {count} entries in the following feed")]
fn sees_entries_in_the_following_feed(world: &WorldFixture, name: String, count: usize) {
    perform(
        &world.world(),
        RequestSpec::get("/api/v1/posts?view=following").as_member(&name),
    );
    assert_eq!(world.world().borrow().last.status, Some(200));
    assert_eq!(entry_count(world), count);
}

#[then("the newest feed entry is by {name}")]
fn the_newest_feed_entry_is_by(world: &WorldFixture, name: String) {
    assert_eq!(
        last_json(&world.world(), "/data/0/author/username"),
        Value::from(name)
    );
}

#[then("the interaction is active")]
fn the_interaction_is_active(world: &WorldFixture) {
    assert_eq!(last_json(&world.world(), "/active"), Value::Bool(true));
}

#[then("the interaction is inactive")]
fn the_interaction_is_inactive(world: &WorldFixture) {
    assert_eq!(last_json(&world.world(), "/active"), Value::Bool(false));
}

#[then("the latest post has {count} likes")]
fn the_latest_post_has_likes(world: &WorldFixture, count: u64) {
    load_latest_post(world);
    assert_eq!(last_json(&world.world(), "/counts/likes"), Value::from(count));
}

#[then("the latest post has {count} replies")]
fn the_latest_post_has_replies(world: &WorldFixture, count: u64) {
    load_latest_post(world);
    assert_eq!(
        last_json(&world.world(), "/counts/replies"),
        Value::from(count)
    );
}

#[then("the latest post lists {count} replies")]
fn the_latest_post_lists_replies(world: &WorldFixture, count: usize) {
    let shared = world.world();
    let id = latest_post(&shared);
    perform(&shared, RequestSpec::get(format!("/api/v1/posts/{id}/replies")));
    assert_eq!(shared.borrow().last.status, Some(200));
    assert_eq!(entry_count(world), count);
}

#[then("{name} has {count} bookmarks")]
fn has_bookmarks(world: &WorldFixture, name: String, count: usize) {
    perform(
        &world.world(),
        RequestSpec::get("/api/v1/bookmarks").as_member(&name),
    );
    assert_eq!(world.world().borrow().last.status, Some(200));
    assert_eq!(entry_count(world), count);
}

#[then("the response is not cached by shared caches")]
fn the_response_is_not_cached_by_shared_caches(world: &WorldFixture) {
    let shared = world.world();
    let ctx = shared.borrow();
    let cache_control = ctx
        .last
        .headers
        .get("cache-control")
        .expect("cache-control header");
    assert!(cache_control.starts_with("private"));
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "A published post appears in the public feed"
)]
fn published_post_appears_in_feed(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "Likes toggle on and off"
)]
fn likes_toggle(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "Replies are counted and previewed"
)]
fn replies_are_counted(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "Only the author may delete a post"
)]
fn only_the_author_deletes(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "The following feed shows followed authors only"
)]
fn following_feed(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "Bookmarks are private to the member"
)]
fn bookmarks_are_private(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/social_feed.feature",
    name = "Anonymous visitors cannot post"
)]
fn anonymous_visitors_cannot_post(world: WorldFixture) {
    drop(world);
}
