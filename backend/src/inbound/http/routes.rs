//! Route table for the REST API.
//!
//! Registration order matters: `/users/me` must be matched before the
//! `/users/{username_or_id}` catch-all.

use actix_web::web;

use crate::inbound::http::{auth, onboarding, portfolio, posts, search, sitemap, users};

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::sign_in)
        .service(auth::sign_out)
        .service(onboarding::suggest_username)
        .service(onboarding::setup_account)
        .service(onboarding::complete_onboarding)
        .service(users::current_user_profile)
        .service(users::update_profile)
        .service(users::update_profile_image)
        .service(users::batch_follow_status)
        .service(portfolio::create_project)
        .service(portfolio::update_project)
        .service(portfolio::delete_project)
        .service(portfolio::remove_project_image)
        .service(portfolio::create_experience)
        .service(portfolio::update_experience)
        .service(portfolio::delete_experience)
        .service(portfolio::remove_experience_image)
        .service(portfolio::create_contact)
        .service(portfolio::update_contact)
        .service(portfolio::delete_contact)
        .service(users::get_user_profile)
        .service(users::toggle_follow)
        .service(users::get_follows)
        .service(posts::fetch_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::delete_post)
        .service(posts::reply_to_post)
        .service(posts::fetch_replies)
        .service(posts::toggle_like)
        .service(posts::toggle_bookmark)
        .service(posts::toggle_repost)
        .service(posts::get_bookmarks)
        .service(search::search_all);
}

/// Register the crawler documents served from the site root.
pub fn configure_crawlers(cfg: &mut web::ServiceConfig) {
    cfg.service(sitemap::sitemap).service(sitemap::robots);
}
